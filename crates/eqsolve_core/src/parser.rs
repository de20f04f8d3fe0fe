use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{Result, SolveError};

/// Lexical unit of an expression string.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Identifier(String),
    Operator(BinaryOp),
    Equals,
    LParen,
    RParen,
}

// --- Tokenizer ---

/// Splits an expression into tokens, skipping whitespace.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_digit() {
            let mut end = position;
            while let Some(&(i, d)) = chars.peek() {
                if d.is_ascii_digit() {
                    end = i + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            // A fractional part needs at least one digit after the point.
            let mut lookahead = chars.clone();
            if let (Some((_, '.')), Some((_, d))) = (lookahead.next(), lookahead.next()) {
                if d.is_ascii_digit() {
                    chars.next();
                    while let Some(&(i, d)) = chars.peek() {
                        if d.is_ascii_digit() {
                            end = i + d.len_utf8();
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }
            }
            let literal = &input[position..end];
            let value = literal
                .parse::<f64>()
                .map_err(|_| SolveError::Lexical { position, found: c })?;
            tokens.push(Token::Number(value));
        } else if c.is_ascii_alphabetic() {
            let mut ident = String::new();
            while let Some(&(_, d)) = chars.peek() {
                if d.is_ascii_alphanumeric() || d == '_' {
                    ident.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Identifier(ident));
        } else {
            let token = match c {
                '(' => Token::LParen,
                ')' => Token::RParen,
                '=' => Token::Equals,
                _ => match BinaryOp::from_char(c) {
                    Some(op) => Token::Operator(op),
                    None => return Err(SolveError::Lexical { position, found: c }),
                },
            };
            tokens.push(token);
            chars.next();
        }
    }
    Ok(tokens)
}

// --- Shunting-yard ---

/// Binding strength of unary minus: above `*` and `/`, level with `^`.
const PREFIX_PRECEDENCE: u8 = 3;

#[derive(Debug, Clone, Copy)]
enum Pending {
    Operator(BinaryOp),
    Function(UnaryOp),
    Prefix(UnaryOp),
    LParen,
}

impl Pending {
    fn into_token(self) -> Result<Token> {
        match self {
            Pending::Operator(op) => Ok(Token::Operator(op)),
            Pending::Function(op) | Pending::Prefix(op) => {
                Ok(Token::Identifier(op.name().to_string()))
            }
            Pending::LParen => Err(SolveError::UnbalancedParenthesis),
        }
    }

    /// Whether this pending entry must be emitted before `incoming` is pushed.
    fn yields_to(self, incoming: BinaryOp) -> bool {
        let outranks = |precedence: u8| {
            precedence > incoming.precedence()
                || (precedence == incoming.precedence() && !incoming.is_right_associative())
        };
        match self {
            Pending::LParen => false,
            Pending::Function(_) => true,
            Pending::Prefix(_) => outranks(PREFIX_PRECEDENCE),
            Pending::Operator(op) => outranks(op.precedence()),
        }
    }
}

/// Reorders infix tokens into postfix order.
///
/// Function names wait on the operator stack until their argument is complete,
/// and a `-` in prefix position is emitted as the `neg` function.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut pending: Vec<Pending> = Vec::new();
    let mut expect_operand = true;

    for token in tokens {
        match token {
            Token::Number(_) => {
                output.push(token.clone());
                expect_operand = false;
            }
            Token::Identifier(name) => match UnaryOp::from_name(name) {
                Some(op) => {
                    pending.push(Pending::Function(op));
                    expect_operand = true;
                }
                None => {
                    output.push(token.clone());
                    expect_operand = false;
                }
            },
            Token::LParen => {
                pending.push(Pending::LParen);
                expect_operand = true;
            }
            Token::RParen => {
                loop {
                    match pending.pop() {
                        Some(Pending::LParen) => break,
                        Some(entry) => output.push(entry.into_token()?),
                        None => return Err(SolveError::UnbalancedParenthesis),
                    }
                }
                if let Some(Pending::Function(op)) = pending.last().copied() {
                    pending.pop();
                    output.push(Token::Identifier(op.name().to_string()));
                }
                expect_operand = false;
            }
            Token::Operator(BinaryOp::Sub) if expect_operand => {
                pending.push(Pending::Prefix(UnaryOp::Neg));
            }
            Token::Operator(op) => {
                while let Some(&top) = pending.last() {
                    if !top.yields_to(*op) {
                        break;
                    }
                    pending.pop();
                    output.push(top.into_token()?);
                }
                pending.push(Pending::Operator(*op));
                expect_operand = true;
            }
            Token::Equals => {
                return Err(SolveError::MalformedExpression(
                    "unexpected '=' inside an expression".to_string(),
                ));
            }
        }
    }

    while let Some(entry) = pending.pop() {
        output.push(entry.into_token()?);
    }
    Ok(output)
}

// --- AST builder ---

fn pop_operand(stack: &mut Vec<Expr>, context: &str) -> Result<Expr> {
    stack
        .pop()
        .ok_or_else(|| SolveError::MalformedExpression(format!("'{context}' is missing an operand")))
}

/// Builds an expression tree from postfix tokens.
pub fn build_ast(postfix: &[Token]) -> Result<Expr> {
    let mut stack: Vec<Expr> = Vec::new();

    for token in postfix {
        match token {
            Token::Number(value) => stack.push(Expr::real(*value)),
            Token::Identifier(name) => match UnaryOp::from_name(name) {
                Some(op) => {
                    let operand = pop_operand(&mut stack, name)?;
                    stack.push(Expr::unary(op, operand));
                }
                None => stack.push(Expr::Variable(name.clone())),
            },
            Token::Operator(op) => {
                let context = op.symbol().to_string();
                let right = pop_operand(&mut stack, &context)?;
                let left = pop_operand(&mut stack, &context)?;
                stack.push(Expr::binary(*op, left, right));
            }
            Token::LParen | Token::RParen | Token::Equals => {
                return Err(SolveError::MalformedExpression(format!(
                    "unexpected {token:?} in postfix input"
                )));
            }
        }
    }

    match stack.len() {
        1 => Ok(stack.remove(0)),
        0 => Err(SolveError::MalformedExpression("empty expression".to_string())),
        n => Err(SolveError::MalformedExpression(format!(
            "{n} operands left without an operator"
        ))),
    }
}

/// Parses a single expression (no `=`).
pub fn parse_expression(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    build_ast(&to_postfix(&tokens)?)
}

/// Parses `<lhs> = <rhs>` into its two sides.
pub fn parse_equation(input: &str) -> Result<(Expr, Expr)> {
    let tokens = tokenize(input)?;
    let split = tokens
        .iter()
        .position(|t| *t == Token::Equals)
        .ok_or(SolveError::MissingEquation)?;
    let lhs = build_ast(&to_postfix(&tokens[..split])?)?;
    let rhs = build_ast(&to_postfix(&tokens[split + 1..])?)?;
    log::trace!("parsed equation: {lhs} = {rhs}");
    Ok((lhs, rhs))
}
