use num_complex::Complex64;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Single-argument operators. The function names double as the tokens the parser recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Sin,
    Cos,
    Tan,
}

impl UnaryOp {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "neg" => Some(UnaryOp::Neg),
            "sin" => Some(UnaryOp::Sin),
            "cos" => Some(UnaryOp::Cos),
            "tan" => Some(UnaryOp::Tan),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            '^' => Some(BinaryOp::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 3,
        }
    }

    pub fn is_right_associative(self) -> bool {
        matches!(self, BinaryOp::Pow)
    }
}

/// Expression tree produced by the parser.
///
/// Trees are immutable once built: the evaluator, the differentiator and the
/// coefficient extractor only read them, and every rewrite returns a new tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Complex64),
    Variable(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn real(value: f64) -> Self {
        Expr::Number(Complex64::new(value, 0.0))
    }

    pub fn var(name: &str) -> Self {
        Expr::Variable(name.to_string())
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary(op, Box::new(operand))
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary(op, Box::new(left), Box::new(right))
    }

    /// Literal value as a non-negative integer, if the node is one.
    pub fn as_natural(&self) -> Option<u32> {
        match self {
            Expr::Number(v) if v.im == 0.0 && v.re >= 0.0 && v.re.fract() == 0.0 => {
                if v.re <= u32::MAX as f64 {
                    Some(v.re as u32)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Literal value as a (possibly negative) integer, if the node is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Expr::Number(v)
                if v.im == 0.0
                    && v.re.fract() == 0.0
                    && v.re >= i64::MIN as f64
                    && v.re < i64::MAX as f64 =>
            {
                Some(v.re as i64)
            }
            _ => None,
        }
    }
}

// Literals are never NaN: the tokenizer only produces finite decimals.
impl Eq for Expr {}

/// Bit pattern of `value` with `-0.0` folded onto `0.0`, matching `==`.
fn canonical_bits(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Expr::Number(v) => {
                canonical_bits(v.re).hash(state);
                canonical_bits(v.im).hash(state);
            }
            Expr::Variable(name) => name.hash(state),
            Expr::Unary(op, operand) => {
                op.hash(state);
                operand.hash(state);
            }
            Expr::Binary(op, left, right) => {
                op.hash(state);
                left.hash(state);
                right.hash(state);
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Expr) -> fmt::Result {
    match operand {
        Expr::Binary(..) => write!(f, "({operand})"),
        _ => write!(f, "{operand}"),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(v) if v.im == 0.0 => write!(f, "{}", v.re),
            Expr::Number(v) => write!(f, "({} + {}i)", v.re, v.im),
            Expr::Variable(name) => write!(f, "{name}"),
            Expr::Unary(UnaryOp::Neg, operand) => {
                write!(f, "-")?;
                write_operand(f, operand)
            }
            Expr::Unary(op, operand) => write!(f, "{}({operand})", op.name()),
            Expr::Binary(op, left, right) => {
                write_operand(f, left)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn square(base: Expr) -> Expr {
        Expr::binary(BinaryOp::Pow, base, Expr::real(2.0))
    }

    #[test]
    fn equality_and_hash_are_structural() {
        let a = Expr::binary(BinaryOp::Add, square(Expr::var("x")), Expr::real(1.0));
        let b = Expr::binary(BinaryOp::Add, square(Expr::var("x")), Expr::real(1.0));
        let c = Expr::binary(BinaryOp::Add, square(Expr::var("y")), Expr::real(1.0));
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }

    fn hash_of(expr: &Expr) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        expr.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn signed_zero_literals_hash_alike() {
        let positive = Expr::real(0.0);
        let negative = Expr::real(-0.0);
        assert_eq!(positive, negative);
        assert_eq!(hash_of(&positive), hash_of(&negative));

        let mut set = HashSet::new();
        set.insert(Expr::binary(BinaryOp::Mul, negative, Expr::var("x")));
        assert!(set.contains(&Expr::binary(BinaryOp::Mul, positive, Expr::var("x"))));
    }

    #[test]
    fn display_parenthesises_nested_binaries() {
        let expr = Expr::binary(
            BinaryOp::Mul,
            Expr::binary(BinaryOp::Add, Expr::var("x"), Expr::real(1.0)),
            Expr::unary(UnaryOp::Sin, Expr::var("x")),
        );
        assert_eq!(expr.to_string(), "(x + 1) * sin(x)");
        let negated = Expr::unary(UnaryOp::Neg, square(Expr::var("x")));
        assert_eq!(negated.to_string(), "-(x ^ 2)");
    }

    #[test]
    fn literal_integer_views() {
        assert_eq!(Expr::real(3.0).as_natural(), Some(3));
        assert_eq!(Expr::real(-3.0).as_natural(), None);
        assert_eq!(Expr::real(-3.0).as_integer(), Some(-3));
        assert_eq!(Expr::real(2.5).as_integer(), None);
        assert_eq!(Expr::Number(Complex64::new(2.0, 1.0)).as_integer(), None);
        assert_eq!(Expr::var("x").as_natural(), None);
        assert_eq!(Expr::real(-1e300).as_integer(), None);
        assert_eq!(Expr::real(f64::INFINITY).as_integer(), None);
    }
}
