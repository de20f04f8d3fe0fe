//! The `eqsolve_core` crate finds the roots of single-variable equations such
//! as `x^3 - 2*x = 1` or `sin(x) = 0.5`.
//!
//! Key components:
//! - **Parser**: tokenizer, shunting-yard conversion to postfix, and an AST builder.
//! - **Evaluator**: complex-valued evaluation of expression trees.
//! - **Differentiator**: structural derivatives of expression trees. It is not used by `solve`.
//! - **Polynomial**: coefficient extraction, which decides whether the algebraic branch applies.
//! - **Solvers**: companion-matrix eigenvalues, Durand–Kerner, and Brent's method.
//! - **Solve**: the driver choosing between the polynomial branch and a bracketed domain search.
pub mod ast;
pub mod differentiator;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod polynomial;
pub mod solve;
pub mod solvers;
pub mod traits;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use differentiator::differentiate;
pub use error::{Result, SolveError};
pub use evaluator::{evaluate, evaluate_at, Environment};
pub use parser::{parse_equation, parse_expression};
pub use polynomial::{
    dense_coefficients, extract_coefficients, horner, CoefficientMap, MAX_DEGREE,
};
pub use solve::{dedup_roots, solve, solve_default, PolynomialMethod, SolveOptions};
pub use solvers::{
    brent, companion_roots, durand_kerner, BrentSettings, CompanionMatrix, DurandKerner,
    DurandKernerSettings,
};
pub use traits::PolynomialSolver;
