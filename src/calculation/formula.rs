//! Earnings formula compilation and evaluation.
//!
//! Formulas come from configuration as plain text over a closed grammar:
//! decimal literals, the four arithmetic operators, parentheses, unary
//! minus, and the bindings `salary`, `daily_rate`, `hourly_rate` and
//! `quantity`. They are compiled once at configuration load so malformed
//! expressions surface immediately instead of during a pay run.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::WageSnapshot;

/// A wage or attendance value a formula can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// The monthly salary from the wage snapshot.
    Salary,
    /// The daily rate from the wage snapshot.
    DailyRate,
    /// The hourly rate from the wage snapshot.
    HourlyRate,
    /// The quantity of the attendance group being priced.
    Quantity,
}

impl Binding {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "salary" => Some(Binding::Salary),
            "daily_rate" => Some(Binding::DailyRate),
            "hourly_rate" => Some(Binding::HourlyRate),
            "quantity" => Some(Binding::Quantity),
            _ => None,
        }
    }

    fn resolve(self, wage: &WageSnapshot, quantity: Decimal) -> Decimal {
        match self {
            Binding::Salary => wage.salary,
            Binding::DailyRate => wage.daily,
            Binding::HourlyRate => wage.hourly,
            Binding::Quantity => quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Literal(Decimal),
    Binding(Binding),
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Decimal),
    Binding(Binding),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{value}"),
            Token::Binding(Binding::Salary) => write!(f, "salary"),
            Token::Binding(Binding::DailyRate) => write!(f, "daily_rate"),
            Token::Binding(Binding::HourlyRate) => write!(f, "hourly_rate"),
            Token::Binding(Binding::Quantity) => write!(f, "quantity"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
        }
    }
}

/// A compiled earnings formula.
///
/// # Example
///
/// ```
/// use misthos_engine::calculation::Formula;
/// use misthos_engine::models::{WageBasis, WageSnapshot};
/// use rust_decimal::Decimal;
///
/// let formula = Formula::compile("salary * quantity / 25").unwrap();
/// let wage = WageSnapshot::derive(WageBasis::Salaried, Decimal::from(1000));
/// let amount = formula.evaluate(&wage, Decimal::from(25)).unwrap();
/// assert_eq!(amount, Decimal::from(1000));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    root: Expr,
}

impl Formula {
    /// Compiles a formula from its source text.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FormulaError`] for anything outside the
    /// grammar: unknown identifiers, stray characters, unbalanced
    /// parentheses or trailing tokens.
    pub fn compile(expression: &str) -> EngineResult<Self> {
        let fail = |message: String| EngineError::FormulaError {
            expression: expression.to_string(),
            message,
        };
        let tokens = tokenize(expression).map_err(&fail)?;
        let mut parser = Parser { tokens, position: 0 };
        let root = parser.expression().map_err(&fail)?;
        if let Some(token) = parser.peek() {
            return Err(fail(format!("unexpected token '{token}' after expression")));
        }
        Ok(Formula {
            source: expression.to_string(),
            root,
        })
    }

    /// The source text the formula was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the formula against a wage snapshot and a quantity.
    ///
    /// The result is unrounded; callers round at the monetary boundary.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::FormulaError`] when evaluation divides by
    /// zero.
    pub fn evaluate(&self, wage: &WageSnapshot, quantity: Decimal) -> EngineResult<Decimal> {
        evaluate_node(&self.root, wage, quantity).map_err(|message| EngineError::FormulaError {
            expression: self.source.clone(),
            message,
        })
    }
}

fn evaluate_node(expr: &Expr, wage: &WageSnapshot, quantity: Decimal) -> Result<Decimal, String> {
    match expr {
        Expr::Literal(value) => Ok(*value),
        Expr::Binding(binding) => Ok(binding.resolve(wage, quantity)),
        Expr::Negate(inner) => Ok(-evaluate_node(inner, wage, quantity)?),
        Expr::Binary { op, left, right } => {
            let left = evaluate_node(left, wage, quantity)?;
            let right = evaluate_node(right, wage, quantity)?;
            match op {
                BinaryOp::Add => Ok(left + right),
                BinaryOp::Subtract => Ok(left - right),
                BinaryOp::Multiply => Ok(left * right),
                BinaryOp::Divide => left
                    .checked_div(right)
                    .ok_or_else(|| "division by zero".to_string()),
            }
        }
    }
}

fn tokenize(expression: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LeftParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RightParen);
            }
            '0'..='9' => {
                let mut literal = String::new();
                let mut seen_dot = false;
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        literal.push(d);
                        chars.next();
                    } else if d == '.' && !seen_dot {
                        seen_dot = true;
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = Decimal::from_str(&literal)
                    .map_err(|_| format!("invalid number literal '{literal}'"))?;
                tokens.push(Token::Number(value));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut name = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        name.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let binding = Binding::from_name(&name)
                    .ok_or_else(|| format!("unknown identifier '{name}'"))?;
                tokens.push(Token::Binding(binding));
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn expression(&mut self) -> Result<Expr, String> {
        let mut left = self.term()?;
        while let Some(op) = match self.peek() {
            Some(Token::Plus) => Some(BinaryOp::Add),
            Some(Token::Minus) => Some(BinaryOp::Subtract),
            _ => None,
        } {
            self.advance();
            let right = self.term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr, String> {
        let mut left = self.unary()?;
        while let Some(op) = match self.peek() {
            Some(Token::Star) => Some(BinaryOp::Multiply),
            Some(Token::Slash) => Some(BinaryOp::Divide),
            _ => None,
        } {
            self.advance();
            let right = self.unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, String> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.advance();
            return Ok(Expr::Negate(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, String> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Literal(value)),
            Some(Token::Binding(binding)) => Ok(Expr::Binding(binding)),
            Some(Token::LeftParen) => {
                let inner = self.expression()?;
                match self.advance() {
                    Some(Token::RightParen) => Ok(inner),
                    Some(token) => Err(format!("expected ')' but found '{token}'")),
                    None => Err("expected ')' but the expression ended".to_string()),
                }
            }
            Some(token) => Err(format!("unexpected token '{token}'")),
            None => Err("expression is empty".to_string()),
        }
    }
}
