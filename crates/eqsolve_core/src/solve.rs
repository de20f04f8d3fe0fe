use crate::ast::{BinaryOp, Expr};
use crate::error::{Result, SolveError};
use crate::evaluator::evaluate_at;
use crate::parser::parse_equation;
use crate::polynomial::{dense_coefficients, extract_coefficients};
use crate::solvers::{
    brent, opposite_signs, BrentSettings, CompanionMatrix, DurandKerner, DurandKernerSettings,
};
use crate::traits::PolynomialSolver;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Which polynomial root finder the algebraic branch uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolynomialMethod {
    #[default]
    Companion,
    DurandKerner,
}

impl PolynomialMethod {
    fn build(self, settings: DurandKernerSettings) -> Box<dyn PolynomialSolver> {
        match self {
            PolynomialMethod::Companion => Box::new(CompanionMatrix),
            PolynomialMethod::DurandKerner => Box::new(DurandKerner { settings }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Name of the unknown.
    pub variable: String,
    /// Brent tolerance on the domain branch and deduplication radius on both.
    pub tolerance: f64,
    pub max_subintervals: usize,
    /// Brent iteration cap per bracketed subinterval.
    pub max_iterations: usize,
    pub method: PolynomialMethod,
    pub durand_kerner: DurandKernerSettings,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            variable: "x".to_string(),
            tolerance: 1e-8,
            max_subintervals: 100,
            max_iterations: BrentSettings::default().max_iterations,
            method: PolynomialMethod::default(),
            durand_kerner: DurandKernerSettings::default(),
        }
    }
}

impl SolveOptions {
    fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(SolveError::InvalidSettings(msg.to_string()));
        if self.variable.is_empty() {
            return invalid("variable name must not be empty.");
        }
        if !(self.tolerance > 0.0) {
            return invalid("tolerance must be positive.");
        }
        if self.max_subintervals == 0 {
            return invalid("max_subintervals must be greater than zero.");
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations must be greater than zero.");
        }
        if self.method == PolynomialMethod::DurandKerner {
            if !(self.durand_kerner.tolerance > 0.0) {
                return invalid("Durand-Kerner tolerance must be positive.");
            }
            if self.durand_kerner.max_iterations == 0 {
                return invalid("Durand-Kerner max_iterations must be greater than zero.");
            }
        }
        Ok(())
    }
}

/// Solves `expr` (of the form `<lhs> = <rhs>`) for `options.variable`.
///
/// Without a domain the equation must be polynomial and every root, real or
/// complex, is returned; a non-polynomial equation fails with `NonPolynomial`
/// rather than falling back to a search. With a domain `[A, B]` real roots are
/// bracketed on `options.max_subintervals` equal pieces and refined with
/// Brent's method; grid points where the real part is exactly zero are
/// reported as they are. Roots closer than `options.tolerance` to an earlier root
/// are dropped.
pub fn solve(
    expr: &str,
    domain: Option<(f64, f64)>,
    options: &SolveOptions,
) -> Result<Vec<Complex64>> {
    options.validate()?;

    let (lhs, rhs) = parse_equation(expr)?;
    let f = Expr::binary(BinaryOp::Sub, lhs, rhs);

    let roots = match domain {
        None => polynomial_roots(&f, options)?,
        Some(bounds) => domain_roots(&f, normalize_domain(bounds)?, options),
    };
    Ok(dedup_roots(roots, options.tolerance))
}

/// `solve` with default options.
pub fn solve_default(expr: &str, domain: Option<(f64, f64)>) -> Result<Vec<Complex64>> {
    solve(expr, domain, &SolveOptions::default())
}

fn polynomial_roots(f: &Expr, options: &SolveOptions) -> Result<Vec<Complex64>> {
    let coefficients = dense_coefficients(&extract_coefficients(f, &options.variable)?)?;
    log::debug!(
        "polynomial branch: degree {} via {:?}",
        coefficients.len() - 1,
        options.method
    );
    options
        .method
        .build(options.durand_kerner)
        .roots(&coefficients)
}

/// Finite, distinct bounds in increasing order.
fn normalize_domain((a, b): (f64, f64)) -> Result<(f64, f64)> {
    if !a.is_finite() || !b.is_finite() {
        return Err(SolveError::InvalidDomain(format!(
            "bounds must be finite, got [{a}, {b}]"
        )));
    }
    if a == b {
        return Err(SolveError::InvalidDomain(format!(
            "bounds must differ, got [{a}, {b}]"
        )));
    }
    Ok(if a < b { (a, b) } else { (b, a) })
}

fn domain_roots(f: &Expr, (lower, upper): (f64, f64), options: &SolveOptions) -> Vec<Complex64> {
    let real_part = |x: f64| evaluate_at(f, &options.variable, Complex64::new(x, 0.0)).re;
    let settings = BrentSettings {
        tolerance: options.tolerance,
        max_iterations: options.max_iterations,
    };
    let n = options.max_subintervals;
    let width = (upper - lower) / n as f64;
    log::debug!("domain branch: [{lower}, {upper}] in {n} subintervals");

    let mut roots = Vec::new();
    let mut a = lower;
    let mut fa = real_part(a);
    for i in 0..n {
        let b = if i + 1 == n { upper } else { lower + (i + 1) as f64 * width };
        let fb = real_part(b);
        // Exact zeros on the grid never bracket, so they are kept directly.
        if fa == 0.0 {
            roots.push(Complex64::new(a, 0.0));
        }
        if opposite_signs(fa, fb) {
            match brent(real_part, a, b, settings) {
                Ok(root) => roots.push(Complex64::new(root, 0.0)),
                Err(err) => log::debug!("skipping [{a}, {b}]: {err}"),
            }
        }
        a = b;
        fa = fb;
    }
    if fa == 0.0 {
        roots.push(Complex64::new(upper, 0.0));
    }
    roots
}

/// Drops every root lying within `tol` of a root kept before it.
pub fn dedup_roots(roots: Vec<Complex64>, tol: f64) -> Vec<Complex64> {
    let mut kept: Vec<Complex64> = Vec::with_capacity(roots.len());
    for root in roots {
        if !kept.iter().any(|k| (k - root).norm() < tol) {
            kept.push(root);
        }
    }
    kept
}
