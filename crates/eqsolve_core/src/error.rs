use thiserror::Error;

/// Everything that can go wrong between reading an equation and returning its roots.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("unexpected character '{found}' at byte {position}")]
    Lexical { position: usize, found: char },

    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,

    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    #[error("expected an equation of the form <lhs> = <rhs>")]
    MissingEquation,

    #[error("expression is not a polynomial: {0}")]
    NonPolynomial(String),

    #[error("polynomial degree exceeds {limit}")]
    DegreeTooHigh { limit: u32 },

    #[error("leading coefficient must not be zero")]
    ZeroLeadingCoefficient,

    #[error("f({a}) and f({b}) do not have opposite signs")]
    NoBracket { a: f64, b: f64 },

    #[error("no derivative rule for {0}")]
    UnsupportedDerivative(String),

    #[error("invalid search domain: {0}")]
    InvalidDomain(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("eigenvalue decomposition of the companion matrix did not converge")]
    EigenDecomposition,
}

pub type Result<T> = std::result::Result<T, SolveError>;
