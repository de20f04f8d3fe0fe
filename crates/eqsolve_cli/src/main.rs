//! eqsolve - solve equations of the form f(x) = 0
//!
//! Polynomial equations are solved algebraically for all real and complex
//! roots; anything else needs a `--domain` to search for real roots in.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Env;
use eqsolve_core::{
    differentiate, parse_equation, solve, BinaryOp, Expr, PolynomialMethod, SolveOptions,
};

mod format;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    /// Eigenvalues of the companion matrix
    Companion,
    /// Durand–Kerner simultaneous iteration
    DurandKerner,
}

impl From<Method> for PolynomialMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Companion => PolynomialMethod::Companion,
            Method::DurandKerner => PolynomialMethod::DurandKerner,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "eqsolve",
    version = env!("CARGO_PKG_VERSION"),
    about = "Solve equations of the form f(x) = 0 (polynomial or generic)"
)]
struct Cli {
    /// Equation in infix form, e.g. "x^2 - 1 = 0" or "sin(x) - 0 = 0"
    expr: String,

    /// Real interval [A, B] to search for roots
    #[arg(long, num_args = 2, value_names = ["A", "B"], allow_negative_numbers = true)]
    domain: Option<Vec<f64>>,

    /// Name of the unknown
    #[arg(long = "var", default_value = "x")]
    variable: String,

    /// Root tolerance (Brent refinement and duplicate removal)
    #[arg(long, default_value_t = 1e-8)]
    tol: f64,

    /// Number of equal subintervals the domain is split into
    #[arg(long, default_value_t = 100)]
    max_subintervals: usize,

    /// Polynomial root finder used when no domain is given
    #[arg(long, value_enum, default_value_t = Method::Companion)]
    method: Method,

    /// Print the derivative of lhs - rhs before solving
    #[arg(long)]
    derivative: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn print_derivative(expr: &str, variable: &str) -> Result<()> {
    let (lhs, rhs) = parse_equation(expr)?;
    let f = Expr::binary(BinaryOp::Sub, lhs, rhs);
    let derivative = differentiate(&f, variable)
        .with_context(|| format!("failed to differentiate \"{expr}\""))?;
    println!("d/d{variable}: {derivative}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let domain = match cli.domain.as_deref() {
        Some(&[a, b]) => Some((a, b)),
        Some(_) => bail!("--domain takes exactly two values"),
        None => None,
    };
    let options = SolveOptions {
        variable: cli.variable,
        tolerance: cli.tol,
        max_subintervals: cli.max_subintervals,
        method: cli.method.into(),
        ..SolveOptions::default()
    };
    log::debug!("solving \"{}\" with {:?}, domain {:?}", cli.expr, options, domain);

    if cli.derivative {
        print_derivative(&cli.expr, &options.variable)?;
    }

    let roots = solve(&cli.expr, domain, &options)
        .with_context(|| format!("failed to solve \"{}\"", cli.expr))?;
    print!("{}", format::render_roots(&roots));
    Ok(())
}
