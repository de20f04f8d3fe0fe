use crate::ast::{BinaryOp, Expr, UnaryOp};
use num_complex::Complex64;
use num_traits::Zero;
use std::collections::HashMap;

/// Variable bindings used during evaluation.
pub type Environment = HashMap<String, Complex64>;

/// Evaluates `expr` over the complex numbers.
///
/// Variables missing from `env` evaluate to zero. Division by zero and
/// `0^negative` are not trapped: the IEEE infinities and NaNs they produce are
/// returned as-is and filtered by the caller.
pub fn evaluate(expr: &Expr, env: &Environment) -> Complex64 {
    match expr {
        Expr::Number(v) => *v,
        Expr::Variable(name) => env.get(name).copied().unwrap_or_else(Complex64::zero),
        Expr::Unary(op, operand) => {
            let u = evaluate(operand, env);
            match op {
                UnaryOp::Neg => -u,
                UnaryOp::Sin => u.sin(),
                UnaryOp::Cos => u.cos(),
                UnaryOp::Tan => u.tan(),
            }
        }
        Expr::Binary(op, left, right) => {
            let a = evaluate(left, env);
            let b = evaluate(right, env);
            match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Pow => power(a, b),
            }
        }
    }
}

/// Evaluates `expr` with a single variable bound.
pub fn evaluate_at(expr: &Expr, variable: &str, value: Complex64) -> Complex64 {
    let mut env = Environment::with_capacity(1);
    env.insert(variable.to_string(), value);
    evaluate(expr, &env)
}

// Integer exponents go through repeated multiplication so that negative real
// bases stay on the real axis.
fn power(base: Complex64, exponent: Complex64) -> Complex64 {
    if exponent.im == 0.0 && exponent.re.fract() == 0.0 && exponent.re.abs() <= i32::MAX as f64 {
        base.powi(exponent.re as i32)
    } else {
        base.powc(exponent)
    }
}
