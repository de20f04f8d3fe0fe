use num_complex::Complex64;

/// Imaginary parts smaller than this are not printed.
pub const IMAGINARY_CUTOFF: f64 = 1e-8;

const SIGNIFICANT_DIGITS: usize = 8;

/// Formats `value` with `digits` significant digits, `%g` style: fixed notation
/// for moderate exponents, scientific otherwise, trailing zeros removed.
pub fn format_significant(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1);
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}"))
    }
}

fn trim_fraction(number: &str) -> String {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        number.to_string()
    }
}

/// One root as printed by the CLI: `re`, or `re + imj` (signed `im`) when the
/// imaginary part matters.
pub fn format_root(root: Complex64) -> String {
    let re = format_significant(root.re, SIGNIFICANT_DIGITS);
    if root.im.abs() < IMAGINARY_CUTOFF {
        re
    } else {
        format!("{re} + {}j", format_significant(root.im, SIGNIFICANT_DIGITS))
    }
}

pub fn render_roots(roots: &[Complex64]) -> String {
    if roots.is_empty() {
        return "No roots found.\n".to_string();
    }
    let mut out = String::from("Roots found:\n");
    for root in roots {
        out.push_str("  ");
        out.push_str(&format_root(*root));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significant_digits_like_printf_g() {
        assert_eq!(format_significant(1.0, 8), "1");
        assert_eq!(format_significant(-1.0, 8), "-1");
        assert_eq!(format_significant(std::f64::consts::PI, 8), "3.1415927");
        assert_eq!(format_significant(0.5, 8), "0.5");
        assert_eq!(format_significant(123456789.0, 8), "1.2345679e+08");
        assert_eq!(format_significant(0.00001234, 8), "1.234e-05");
        assert_eq!(format_significant(0.0001234, 8), "0.0001234");
        assert_eq!(format_significant(99999999.5, 8), "1e+08");
        assert_eq!(format_significant(0.0, 8), "0");
    }

    #[test]
    fn roots_drop_negligible_imaginary_parts() {
        assert_eq!(format_root(Complex64::new(2.0, 1e-12)), "2");
        assert_eq!(format_root(Complex64::new(0.0, 1.0)), "0 + 1j");
        assert_eq!(format_root(Complex64::new(1.0, -1.0)), "1 + -1j");
        assert_eq!(format_root(Complex64::new(-0.5, -0.8660254037844386)), "-0.5 + -0.8660254j");
    }

    #[test]
    fn render_empty_and_non_empty() {
        assert_eq!(render_roots(&[]), "No roots found.\n");
        assert_eq!(
            render_roots(&[Complex64::new(1.0, 0.0), Complex64::new(-1.0, 0.0)]),
            "Roots found:\n  1\n  -1\n"
        );
    }
}
