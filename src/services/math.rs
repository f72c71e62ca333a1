//! Arithmetic solving.
//!
//! Expressions over numbers with `+ - * / ^ ( )` are evaluated; equations in
//! a single variable are solved when they are linear or quadratic. Anything
//! else produces a single apology line instead of an error.

use thiserror::Error;

/// Line returned when a problem cannot be solved.
pub const APOLOGY: &str = "Sorry, I couldn't solve this math problem.";

const EPSILON: f64 = 1e-9;

/// Deepest nesting of parentheses, signs and exponents the parser accepts.
const MAX_DEPTH: usize = 64;

/// Longest input, in tokens, the parser accepts.
const MAX_TOKENS: usize = 1024;

/// Turns a math question into human-readable steps.
pub trait MathSolver: Send + Sync {
    /// Returns the solution steps, or a single apology line.
    fn solve(&self, text: &str) -> Vec<String>;
}

/// Why a math problem could not be solved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected token after position {0}")]
    TrailingInput(usize),

    #[error("more than one variable ({0}, {1})")]
    TooManyVariables(String, String),

    #[error("expression contains the variable '{0}'")]
    Symbolic(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NotFinite,

    #[error("equation must contain exactly one '='")]
    MalformedEquation,

    #[error("equation is not linear or quadratic")]
    UnsupportedDegree,

    #[error("expression is nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("expression has more than {0} tokens")]
    TooLong(usize),
}

/// Built-in solver for arithmetic and polynomial equations up to degree two.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArithmeticSolver;

impl MathSolver for ArithmeticSolver {
    fn solve(&self, text: &str) -> Vec<String> {
        let result = if text.contains('=') {
            self.solve_equation(text)
        } else {
            self.evaluate(text).map(|value| {
                vec![
                    format!("The expression is {}", tidy(text)),
                    format!("Final answer is {}", format_number(value)),
                ]
            })
        };

        result.unwrap_or_else(|e| {
            tracing::debug!(input = text, error = %e, "Math problem not solved");
            vec![APOLOGY.to_string()]
        })
    }
}

impl ArithmeticSolver {
    /// Evaluates an expression without variables.
    pub fn evaluate(&self, text: &str) -> Result<f64, MathError> {
        let parsed = Parser::parse(text)?;
        if let Some(name) = parsed.variable {
            return Err(MathError::Symbolic(name));
        }
        parsed.expr.eval(0.0)
    }

    /// Solves `left = right` for its variable.
    fn solve_equation(&self, text: &str) -> Result<Vec<String>, MathError> {
        let mut sides = text.split('=');
        let (Some(left), Some(right), None) = (sides.next(), sides.next(), sides.next()) else {
            return Err(MathError::MalformedEquation);
        };

        let lhs = Parser::parse(left)?;
        let rhs = Parser::parse(right)?;
        let variable = match (lhs.variable.clone(), rhs.variable.clone()) {
            (Some(a), Some(b)) if a != b => return Err(MathError::TooManyVariables(a, b)),
            (a, b) => a.or(b),
        };

        let statement = format!("The equation is {} = {}", tidy(left), tidy(right));
        let f = |x: f64| -> Result<f64, MathError> { Ok(lhs.expr.eval(x)? - rhs.expr.eval(x)?) };

        let Some(name) = variable else {
            return Ok(vec![statement, "No solution found.".to_string()]);
        };

        // Fit f(x) = a x^2 + b x + c from three samples, then check two more.
        let c = f(0.0)?;
        let (f1, fm1) = (f(1.0)?, f(-1.0)?);
        let a = (f1 + fm1) / 2.0 - c;
        let b = (f1 - fm1) / 2.0;
        for x in [2.0, -3.0] {
            let expected = a * x * x + b * x + c;
            if (f(x)? - expected).abs() > EPSILON * (1.0 + expected.abs()) {
                return Err(MathError::UnsupportedDegree);
            }
        }

        let roots = solve_quadratic(a, b, c);
        if roots.is_empty() {
            return Ok(vec![statement, "No solution found.".to_string()]);
        }

        let solution = roots
            .iter()
            .map(|root| format!("{} = {}", name, format_number(*root)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(vec![statement, format!("Solution: {}", solution)])
    }
}

/// Real roots of `a x^2 + b x + c = 0`, ascending. Identities and
/// contradictions have no listed roots.
fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < EPSILON {
        if b.abs() < EPSILON {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < -EPSILON {
        return Vec::new();
    }
    if discriminant.abs() <= EPSILON {
        return vec![-b / (2.0 * a)];
    }

    let sqrt = discriminant.sqrt();
    let mut roots = vec![(-b - sqrt) / (2.0 * a), (-b + sqrt) / (2.0 * a)];
    roots.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    roots
}

/// Prints integers without a fractional part and trims trailing zeros.
fn format_number(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < EPSILON && rounded.abs() < 1e15 {
        // avoid "-0"
        return format!("{}", rounded as i64);
    }
    let text = format!("{:.6}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn tidy(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ═══════════════════════════════════════════════════════════════════════════
// Parsing
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
enum Expr {
    Num(f64),
    Var,
    Neg(Box<Expr>),
    Binary(char, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self, x: f64) -> Result<f64, MathError> {
        let value = match self {
            Expr::Num(n) => *n,
            Expr::Var => x,
            Expr::Neg(inner) => -inner.eval(x)?,
            Expr::Binary(op, lhs, rhs) => {
                let (l, r) = (lhs.eval(x)?, rhs.eval(x)?);
                match op {
                    '+' => l + r,
                    '-' => l - r,
                    '*' => l * r,
                    '/' if r == 0.0 => return Err(MathError::DivisionByZero),
                    '/' => l / r,
                    _ => l.powf(r),
                }
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(MathError::NotFinite)
        }
    }
}

struct Parsed {
    expr: Expr,
    variable: Option<String>,
}

/// Recursive-descent parser; `^` (or `**`) binds tighter than unary minus
/// and associates to the right.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    variable: Option<String>,
}

impl Parser {
    fn parse(text: &str) -> Result<Parsed, MathError> {
        let tokens = tokenize(text)?;
        // Bounds the tree, so evaluating and dropping it cannot recurse too far.
        if tokens.len() > MAX_TOKENS {
            return Err(MathError::TooLong(MAX_TOKENS));
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
            variable: None,
        };

        let expr = parser.expression()?;
        if parser.pos < parser.tokens.len() {
            return Err(MathError::TrailingInput(parser.pos));
        }

        Ok(Parsed {
            expr,
            variable: parser.variable,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expression(&mut self) -> Result<Expr, MathError> {
        let mut lhs = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, MathError> {
        let mut lhs = self.unary()?;
        while let Some(Token::Op(op @ ('*' | '/'))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// Every recursive path of the grammar passes through here.
    fn unary(&mut self) -> Result<Expr, MathError> {
        if self.depth >= MAX_DEPTH {
            return Err(MathError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let expr = self.signed();
        self.depth -= 1;
        expr
    }

    fn signed(&mut self) -> Result<Expr, MathError> {
        match self.peek() {
            Some(Token::Op('-')) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Op('+')) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, MathError> {
        let base = self.atom()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Expr::Binary('^', Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, MathError> {
        match self.next() {
            Some(Token::Num(n)) => Ok(Expr::Num(n)),
            Some(Token::Ident(name)) => {
                match &self.variable {
                    Some(existing) if *existing != name => {
                        return Err(MathError::TooManyVariables(existing.clone(), name));
                    }
                    _ => self.variable = Some(name),
                }
                Ok(Expr::Var)
            }
            Some(Token::LParen) => {
                let inner = self.expression()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(_) => Err(MathError::TrailingInput(self.pos - 1)),
                    None => Err(MathError::UnexpectedEnd),
                }
            }
            Some(_) => Err(MathError::TrailingInput(self.pos - 1)),
            None => Err(MathError::UnexpectedEnd),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, MathError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            _ if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| MathError::UnexpectedChar(c))?;
                tokens.push(Token::Num(value));
            }
            _ if c.is_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_alphanumeric() {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Op('^'));
                i += 2;
            }
            '+' | '-' | '*' | '/' | '^' => {
                tokens.push(Token::Op(c));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            _ => return Err(MathError::UnexpectedChar(c)),
        }
    }

    Ok(tokens)
}
