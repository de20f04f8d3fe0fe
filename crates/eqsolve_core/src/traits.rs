use crate::error::Result;
use num_complex::Complex64;

/// A method that finds every root of a polynomial at once.
///
/// `coefficients` are dense and ascending: `coefficients[k]` multiplies `x^k`,
/// so the last entry is the leading coefficient.
pub trait PolynomialSolver {
    fn roots(&self, coefficients: &[Complex64]) -> Result<Vec<Complex64>>;
}
