use crate::error::{Result, SolveError};
use crate::polynomial::horner;
use crate::traits::PolynomialSolver;
use nalgebra::linalg::Schur;
use nalgebra::DMatrix;
use num_complex::Complex64;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Offset applied to the roots of unity used as Durand–Kerner starting points.
/// Keeping the guesses off the real axis stops real polynomials from trapping
/// conjugate roots on it.
const INITIAL_PHASE: f64 = 0.4;

/// Iteration cap for the complex Schur decomposition.
const SCHUR_MAX_ITERATIONS: usize = 10_000;

fn leading_coefficient(coefficients: &[Complex64]) -> Result<Complex64> {
    match coefficients.last() {
        Some(c) if !c.is_zero() => Ok(*c),
        _ => Err(SolveError::ZeroLeadingCoefficient),
    }
}

/// True when one value is strictly negative and the other strictly positive.
pub fn opposite_signs(a: f64, b: f64) -> bool {
    (a < 0.0 && b > 0.0) || (a > 0.0 && b < 0.0)
}

// --- Companion matrix ---

/// Roots of a polynomial as the eigenvalues of its companion matrix.
///
/// The order of the returned roots is whatever the eigenvalue routine
/// produces.
pub fn companion_roots(coefficients: &[Complex64]) -> Result<Vec<Complex64>> {
    let leading = leading_coefficient(coefficients)?;
    let n = coefficients.len() - 1;
    if n == 0 {
        return Ok(Vec::new());
    }

    if coefficients.iter().all(|c| c.im == 0.0) {
        let mut companion = DMatrix::<f64>::zeros(n, n);
        for i in 0..n - 1 {
            companion[(i, i + 1)] = 1.0;
        }
        for j in 0..n {
            companion[(n - 1, j)] = -coefficients[j].re / leading.re;
        }
        return Ok(companion.complex_eigenvalues().iter().copied().collect());
    }

    let mut companion = DMatrix::<Complex64>::zeros(n, n);
    for i in 0..n - 1 {
        companion[(i, i + 1)] = Complex64::one();
    }
    for j in 0..n {
        companion[(n - 1, j)] = -coefficients[j] / leading;
    }
    Schur::try_new(companion, f64::EPSILON, SCHUR_MAX_ITERATIONS)
        .and_then(|schur| schur.eigenvalues())
        .map(|values| values.iter().copied().collect())
        .ok_or(SolveError::EigenDecomposition)
}

/// Companion-matrix strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanionMatrix;

impl PolynomialSolver for CompanionMatrix {
    fn roots(&self, coefficients: &[Complex64]) -> Result<Vec<Complex64>> {
        companion_roots(coefficients)
    }
}

// --- Durand–Kerner ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DurandKernerSettings {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for DurandKernerSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 500,
        }
    }
}

/// Refines all roots simultaneously with Weierstrass corrections.
///
/// Returns the current guesses once every guess moves less than
/// `settings.tolerance`, or after `settings.max_iterations` rounds whether or
/// not they converged. Callers that need a guarantee must check residuals.
pub fn durand_kerner(
    coefficients: &[Complex64],
    settings: DurandKernerSettings,
) -> Result<Vec<Complex64>> {
    let leading = leading_coefficient(coefficients)?;
    let n = coefficients.len() - 1;
    if n == 0 {
        return Ok(Vec::new());
    }

    let monic: Vec<Complex64> = coefficients.iter().map(|c| c / leading).collect();
    let mut roots: Vec<Complex64> = (0..n)
        .map(|k| Complex64::from_polar(1.0, TAU * k as f64 / n as f64 + INITIAL_PHASE))
        .collect();

    for iteration in 0..settings.max_iterations {
        let previous = roots.clone();
        let mut largest_step = 0.0_f64;
        for i in 0..n {
            let z = previous[i];
            let denominator = previous
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold(Complex64::one(), |acc, (_, &w)| acc * (z - w));
            let step = horner(&monic, z) / denominator;
            roots[i] = z - step;
            largest_step = if step.is_finite() {
                largest_step.max(step.norm())
            } else {
                f64::INFINITY
            };
        }
        if largest_step < settings.tolerance {
            log::trace!("Durand-Kerner converged after {} iterations", iteration + 1);
            return Ok(roots);
        }
    }

    log::debug!(
        "Durand-Kerner stopped after {} iterations without converging",
        settings.max_iterations
    );
    Ok(roots)
}

/// Durand–Kerner strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurandKerner {
    pub settings: DurandKernerSettings,
}

impl PolynomialSolver for DurandKerner {
    fn roots(&self, coefficients: &[Complex64]) -> Result<Vec<Complex64>> {
        durand_kerner(coefficients, self.settings)
    }
}

// --- Brent ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BrentSettings {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for BrentSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 100,
        }
    }
}

/// Brent's bracketed root refinement on `[a, b]`.
///
/// `f(a)` and `f(b)` must have strictly opposite signs. If the bracket has not
/// shrunk below `settings.tolerance` after `settings.max_iterations` steps the
/// current best estimate is returned.
pub fn brent<F>(mut f: F, a: f64, b: f64, settings: BrentSettings) -> Result<f64>
where
    F: FnMut(f64) -> f64,
{
    let (mut a, mut b) = (a, b);
    let (mut fa, mut fb) = (f(a), f(b));
    if !opposite_signs(fa, fb) {
        return Err(SolveError::NoBracket { a, b });
    }
    if fa.abs() < fb.abs() {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let tol = settings.tolerance;
    let mut c = a;
    let mut fc = fa;
    let mut d = c;
    let mut bisected = true;

    for _ in 0..settings.max_iterations {
        if fb == 0.0 || (b - a).abs() < tol {
            return Ok(b);
        }

        let mut s = if fa != fc && fb != fc {
            // Inverse quadratic interpolation
            a * fb * fc / ((fa - fb) * (fa - fc))
                + b * fa * fc / ((fb - fa) * (fb - fc))
                + c * fa * fb / ((fc - fa) * (fc - fb))
        } else {
            // Secant
            b - fb * (b - a) / (fb - fa)
        };

        let quarter = (3.0 * a + b) / 4.0;
        let outside = !(s > quarter.min(b) && s < quarter.max(b));
        let slow = if bisected {
            (s - b).abs() >= (b - c).abs() / 2.0 || (b - c).abs() < tol
        } else {
            (s - b).abs() >= (c - d).abs() / 2.0 || (c - d).abs() < tol
        };
        if outside || slow {
            s = (a + b) / 2.0;
            bisected = true;
        } else {
            bisected = false;
        }

        let fs = f(s);
        d = c;
        c = b;
        fc = fb;
        if opposite_signs(fa, fs) {
            b = s;
            fb = fs;
        } else {
            a = s;
            fa = fs;
        }
        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }
    }

    log::debug!(
        "Brent stopped after {} iterations, bracket width {:e}",
        settings.max_iterations,
        (b - a).abs()
    );
    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(values: &[f64]) -> Vec<Complex64> {
        values.iter().map(|&v| Complex64::new(v, 0.0)).collect()
    }

    /// Every expected root is matched by some returned root, and the counts agree.
    fn assert_same_roots(found: &[Complex64], expected: &[Complex64], tol: f64) {
        assert_eq!(found.len(), expected.len(), "found {found:?}");
        for e in expected {
            assert!(
                found.iter().any(|r| (r - e).norm() < tol),
                "expected root {e} missing from {found:?}"
            );
        }
    }

    #[test]
    fn companion_roots_of_quadratic() {
        let roots = companion_roots(&real(&[-1.0, 0.0, 1.0])).expect("roots");
        assert_same_roots(&roots, &real(&[1.0, -1.0]), 1e-10);
    }

    #[test]
    fn companion_roots_of_scaled_cubic() {
        // 2(x - 1)(x - 2)(x - 3)
        let roots = companion_roots(&real(&[-12.0, 22.0, -12.0, 2.0])).expect("roots");
        assert_same_roots(&roots, &real(&[1.0, 2.0, 3.0]), 1e-8);
    }

    #[test]
    fn companion_roots_can_be_complex() {
        let roots = companion_roots(&real(&[1.0, 0.0, 1.0])).expect("roots");
        assert_same_roots(
            &roots,
            &[Complex64::new(0.0, 1.0), Complex64::new(0.0, -1.0)],
            1e-10,
        );
    }

    #[test]
    fn companion_roots_with_complex_coefficients() {
        // (x - i)(x - 2) = x^2 - (2 + i)x + 2i
        let coefficients = vec![
            Complex64::new(0.0, 2.0),
            Complex64::new(-2.0, -1.0),
            Complex64::new(1.0, 0.0),
        ];
        let roots = companion_roots(&coefficients).expect("roots");
        assert_same_roots(
            &roots,
            &[Complex64::new(0.0, 1.0), Complex64::new(2.0, 0.0)],
            1e-8,
        );
    }

    #[test]
    fn companion_roots_rejects_zero_leading_coefficient() {
        assert_eq!(
            companion_roots(&real(&[1.0, 2.0, 0.0])).unwrap_err(),
            SolveError::ZeroLeadingCoefficient
        );
        assert_eq!(
            companion_roots(&[]).unwrap_err(),
            SolveError::ZeroLeadingCoefficient
        );
        assert!(companion_roots(&real(&[5.0])).expect("constant").is_empty());
    }

    #[test]
    fn durand_kerner_quadratic() {
        let roots =
            durand_kerner(&real(&[-1.0, 0.0, 1.0]), DurandKernerSettings::default()).expect("dk");
        assert_same_roots(&roots, &real(&[1.0, -1.0]), 1e-6);
    }

    #[test]
    fn durand_kerner_finds_conjugate_pair() {
        let roots =
            durand_kerner(&real(&[1.0, 0.0, 1.0]), DurandKernerSettings::default()).expect("dk");
        assert_same_roots(
            &roots,
            &[Complex64::new(0.0, 1.0), Complex64::new(0.0, -1.0)],
            1e-6,
        );
    }

    #[test]
    fn durand_kerner_cubic_matches_companion() {
        let coefficients = real(&[-6.0, 11.0, -6.0, 1.0]);
        let dk = DurandKerner::default().roots(&coefficients).expect("dk");
        let companion = CompanionMatrix.roots(&coefficients).expect("companion");
        assert_same_roots(&dk, &companion, 1e-6);
        for root in dk {
            assert!(horner(&coefficients, root).norm() < 1e-8);
        }
    }

    #[test]
    fn durand_kerner_returns_guesses_without_converging() {
        let settings = DurandKernerSettings {
            tolerance: 1e-14,
            max_iterations: 1,
        };
        let roots = durand_kerner(&real(&[-6.0, 11.0, -6.0, 1.0]), settings).expect("dk");
        assert_eq!(roots.len(), 3);
        assert_eq!(
            durand_kerner(&real(&[1.0, 0.0]), settings).unwrap_err(),
            SolveError::ZeroLeadingCoefficient
        );
    }

    #[test]
    fn brent_finds_linear_root() {
        let root = brent(|x| x - 2.0, 0.0, 4.0, BrentSettings::default()).expect("bracket");
        assert!((root - 2.0).abs() < 1e-8);
    }

    #[test]
    fn brent_refines_transcendental_root() {
        let settings = BrentSettings {
            tolerance: 1e-10,
            max_iterations: 100,
        };
        let root = brent(|x: f64| x.cos() - x, 0.0, 1.0, settings).expect("bracket");
        assert!((root.cos() - root).abs() < 1e-9);
        let root = brent(f64::sin, 3.0, 4.0, settings).expect("bracket");
        assert!((root - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn brent_requires_opposite_signs() {
        let err = brent(|x| x * x + 1.0, -1.0, 1.0, BrentSettings::default()).unwrap_err();
        assert!(matches!(err, SolveError::NoBracket { .. }));
        let err = brent(|x| x - 2.0, 3.0, 5.0, BrentSettings::default()).unwrap_err();
        assert!(matches!(err, SolveError::NoBracket { .. }));
        // A root sitting on an endpoint is not a strict sign change.
        let err = brent(|x| x, 0.0, 1.0, BrentSettings::default()).unwrap_err();
        assert!(matches!(err, SolveError::NoBracket { .. }));
    }

    #[test]
    fn brent_returns_best_estimate_when_iterations_run_out() {
        let settings = BrentSettings {
            tolerance: 1e-15,
            max_iterations: 2,
        };
        let root = brent(|x: f64| x.powi(3) - 2.0, 0.0, 2.0, settings).expect("bracket");
        assert!((0.0..=2.0).contains(&root));
    }

    #[test]
    fn opposite_signs_is_strict() {
        assert!(opposite_signs(-1.0, 2.0));
        assert!(opposite_signs(3.0, -0.5));
        assert!(!opposite_signs(0.0, 1.0));
        assert!(!opposite_signs(f64::NAN, 1.0));
        assert!(!opposite_signs(2.0, 2.0));
    }
}
