use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{Result, SolveError};
use num_complex::Complex64;
use num_traits::{One, Zero};
use std::collections::BTreeMap;

/// Coefficients keyed by power; absent powers are zero.
pub type CoefficientMap = BTreeMap<u32, Complex64>;

/// Highest degree the extractor will build.
pub const MAX_DEGREE: u32 = 1024;

/// Reads `expr` as a polynomial in `variable`.
///
/// Only sums, differences, products, negation and powers with a literal
/// non-negative integer exponent are accepted; anything else is reported as
/// `NonPolynomial`. The orchestrator relies on this to pick the algebraic
/// branch.
pub fn extract_coefficients(expr: &Expr, variable: &str) -> Result<CoefficientMap> {
    match expr {
        Expr::Number(v) => Ok(CoefficientMap::from([(0, *v)])),
        Expr::Variable(name) if name == variable => {
            Ok(CoefficientMap::from([(1, Complex64::one())]))
        }
        Expr::Variable(name) => Err(SolveError::NonPolynomial(format!(
            "unknown symbol '{name}' (solving for '{variable}')"
        ))),
        Expr::Unary(UnaryOp::Neg, operand) => {
            let mut map = extract_coefficients(operand, variable)?;
            for coefficient in map.values_mut() {
                *coefficient = -*coefficient;
            }
            Ok(map)
        }
        Expr::Unary(op, operand) => Err(SolveError::NonPolynomial(format!(
            "{}({operand})",
            op.name()
        ))),
        Expr::Binary(BinaryOp::Add, left, right) => {
            let mut map = extract_coefficients(left, variable)?;
            merge(&mut map, &extract_coefficients(right, variable)?, 1.0);
            Ok(map)
        }
        Expr::Binary(BinaryOp::Sub, left, right) => {
            let mut map = extract_coefficients(left, variable)?;
            merge(&mut map, &extract_coefficients(right, variable)?, -1.0);
            Ok(map)
        }
        Expr::Binary(BinaryOp::Mul, left, right) => convolve(
            &extract_coefficients(left, variable)?,
            &extract_coefficients(right, variable)?,
        ),
        Expr::Binary(BinaryOp::Pow, base, exponent) => {
            let n = exponent.as_natural().ok_or_else(|| {
                SolveError::NonPolynomial(format!("exponent {exponent} is not a non-negative integer"))
            })?;
            let base_map = extract_coefficients(base, variable)?;
            let base_degree = base_map.keys().next_back().copied().unwrap_or(0);
            if base_degree == 0 {
                let constant = base_map.get(&0).copied().unwrap_or_else(Complex64::zero);
                return Ok(CoefficientMap::from([(0, constant.powu(n))]));
            }
            base_degree
                .checked_mul(n)
                .filter(|&degree| degree <= MAX_DEGREE)
                .ok_or(SolveError::DegreeTooHigh { limit: MAX_DEGREE })?;
            let mut result = CoefficientMap::from([(0, Complex64::one())]);
            for _ in 0..n {
                result = convolve(&result, &base_map)?;
            }
            Ok(result)
        }
        Expr::Binary(BinaryOp::Div, ..) => {
            Err(SolveError::NonPolynomial(format!("division in {expr}")))
        }
    }
}

fn merge(into: &mut CoefficientMap, other: &CoefficientMap, sign: f64) {
    for (&power, &coefficient) in other {
        *into.entry(power).or_insert_with(Complex64::zero) += coefficient * sign;
    }
}

/// Cauchy product of two coefficient maps.
fn convolve(a: &CoefficientMap, b: &CoefficientMap) -> Result<CoefficientMap> {
    let mut product = CoefficientMap::new();
    for (&pa, &ca) in a {
        for (&pb, &cb) in b {
            let power = pa
                .checked_add(pb)
                .filter(|&power| power <= MAX_DEGREE)
                .ok_or(SolveError::DegreeTooHigh { limit: MAX_DEGREE })?;
            *product.entry(power).or_insert_with(Complex64::zero) += ca * cb;
        }
    }
    Ok(product)
}

/// Dense coefficient list, power 0 first.
///
/// Fails with `ZeroLeadingCoefficient` when the highest recorded power has a
/// zero coefficient or the map is empty.
pub fn dense_coefficients(map: &CoefficientMap) -> Result<Vec<Complex64>> {
    let (&degree, leading) = map
        .last_key_value()
        .ok_or(SolveError::ZeroLeadingCoefficient)?;
    if leading.is_zero() {
        return Err(SolveError::ZeroLeadingCoefficient);
    }
    let mut dense = vec![Complex64::zero(); degree as usize + 1];
    for (&power, &coefficient) in map {
        dense[power as usize] = coefficient;
    }
    Ok(dense)
}

/// Evaluates a dense coefficient list (power 0 first) at `x`.
pub fn horner(coefficients: &[Complex64], x: Complex64) -> Complex64 {
    coefficients
        .iter()
        .rev()
        .fold(Complex64::zero(), |acc, &c| acc * x + c)
}
