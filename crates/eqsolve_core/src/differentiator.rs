//! Structural differentiation of expression trees.
//!
//! Each rule maps a node onto a freshly built derivative tree. No
//! simplification is attempted apart from dropping a trailing `* 1` in the
//! power rule.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{Result, SolveError};

/// Returns the derivative of `expr` with respect to `variable`.
pub fn differentiate(expr: &Expr, variable: &str) -> Result<Expr> {
    use BinaryOp::*;

    let derivative = match expr {
        Expr::Number(_) => Expr::real(0.0),
        Expr::Variable(name) if name == variable => Expr::real(1.0),
        Expr::Variable(_) => Expr::real(0.0),
        Expr::Unary(UnaryOp::Neg, u) => {
            Expr::unary(UnaryOp::Neg, differentiate(u, variable)?)
        }
        // (sin u)' = cos(u) * u'
        Expr::Unary(UnaryOp::Sin, u) => Expr::binary(
            Mul,
            Expr::unary(UnaryOp::Cos, (**u).clone()),
            differentiate(u, variable)?,
        ),
        // (cos u)' = -sin(u) * u'
        Expr::Unary(UnaryOp::Cos, u) => Expr::binary(
            Mul,
            Expr::unary(UnaryOp::Neg, Expr::unary(UnaryOp::Sin, (**u).clone())),
            differentiate(u, variable)?,
        ),
        // (tan u)' = (1 + tan(u)^2) * u'
        Expr::Unary(UnaryOp::Tan, u) => {
            let tan_u = Expr::unary(UnaryOp::Tan, (**u).clone());
            let sec_squared = Expr::binary(
                Add,
                Expr::real(1.0),
                Expr::binary(Pow, tan_u, Expr::real(2.0)),
            );
            Expr::binary(Mul, sec_squared, differentiate(u, variable)?)
        }
        Expr::Binary(op @ (Add | Sub), a, b) => Expr::binary(
            *op,
            differentiate(a, variable)?,
            differentiate(b, variable)?,
        ),
        Expr::Binary(Mul, a, b) => Expr::binary(
            Add,
            Expr::binary(Mul, differentiate(a, variable)?, (**b).clone()),
            Expr::binary(Mul, (**a).clone(), differentiate(b, variable)?),
        ),
        Expr::Binary(Div, a, b) => {
            let numerator = Expr::binary(
                Sub,
                Expr::binary(Mul, differentiate(a, variable)?, (**b).clone()),
                Expr::binary(Mul, (**a).clone(), differentiate(b, variable)?),
            );
            let denominator = Expr::binary(Pow, (**b).clone(), Expr::real(2.0));
            Expr::binary(Div, numerator, denominator)
        }
        Expr::Binary(Pow, a, exponent) => {
            let n = exponent.as_integer().ok_or_else(|| {
                SolveError::UnsupportedDerivative(format!("power with exponent {exponent}"))
            })?;
            let reduced = n.checked_sub(1).ok_or_else(|| {
                SolveError::UnsupportedDerivative(format!("power with exponent {exponent}"))
            })?;
            let outer = Expr::binary(
                Mul,
                Expr::real(n as f64),
                Expr::binary(Pow, (**a).clone(), Expr::real(reduced as f64)),
            );
            let inner = differentiate(a, variable)?;
            if inner == Expr::real(1.0) {
                outer
            } else {
                Expr::binary(Mul, outer, inner)
            }
        }
    };
    Ok(derivative)
}
