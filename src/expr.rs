//! Restricted boolean expression evaluation for template conditionals.
//! Supports `or`, `and`, `not`, equality, membership, parentheses, string
//! and integer literals, and identifiers resolved against the
//! configuration mapping. Deliberately not a general-purpose language.

use serde_json::Value;

use crate::config::{lookup, truthy, Context};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    LParen,
    RParen,
    Eq,
    Ne,
}

/// A parsed conditional expression. Parsing happens at template compile
/// time; evaluation happens at render time against the configuration
/// mapping.
#[derive(Debug, Clone)]
pub enum Expr {
    Lookup(String),
    Literal(Value),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Eq(Box<Expr>, Box<Expr>),
    Ne(Box<Expr>, Box<Expr>),
    In(Box<Expr>, Box<Expr>),
}

fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '=' | '!' => {
                chars.next();
                match chars.next() {
                    Some((_, '=')) => tokens.push(if ch == '=' {
                        Token::Eq
                    } else {
                        Token::Ne
                    }),
                    _ => {
                        return Err(Error::TemplateSyntax(format!(
                            "unexpected character '{}' in expression '{}'",
                            ch, source
                        )))
                    }
                }
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, c)) => value.push(c),
                        None => {
                            return Err(Error::TemplateSyntax(format!(
                                "unterminated string literal in expression '{}'",
                                source
                            )))
                        }
                    }
                }
                tokens.push(Token::Str(value));
            }
            c if c.is_ascii_digit() => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() {
                        end = i;
                        chars.next();
                    } else {
                        break;
                    }
                }
                let text = &source[start..=end];
                let value = text.parse::<i64>().map_err(|_| {
                    Error::TemplateSyntax(format!("invalid integer '{}'", text))
                })?;
                tokens.push(Token::Int(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        end = i;
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(source[start..=end].to_string()));
            }
            other => {
                return Err(Error::TemplateSyntax(format!(
                    "unexpected character '{}' in expression '{}'",
                    other, source
                )))
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Some(Token::Ident(word)) if word == keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or_expr(&mut self) -> Result<Expr> {
        let mut left = self.and_expr()?;
        while self.eat_keyword("or") {
            let right = self.and_expr()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expr> {
        let mut left = self.not_expr()?;
        while self.eat_keyword("and") {
            let right = self.not_expr()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> Result<Expr> {
        if self.eat_keyword("not") {
            let inner = self.not_expr()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr> {
        let left = self.primary()?;
        match self.peek() {
            Some(Token::Eq) => {
                self.pos += 1;
                let right = self.primary()?;
                Ok(Expr::Eq(Box::new(left), Box::new(right)))
            }
            Some(Token::Ne) => {
                self.pos += 1;
                let right = self.primary()?;
                Ok(Expr::Ne(Box::new(left), Box::new(right)))
            }
            Some(Token::Ident(word)) if word == "in" => {
                self.pos += 1;
                let right = self.primary()?;
                Ok(Expr::In(Box::new(left), Box::new(right)))
            }
            _ => Ok(left),
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.next() {
            Some(Token::LParen) => {
                let inner = self.or_expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(Error::TemplateSyntax(
                        "expected ')' in expression".to_string(),
                    )),
                }
            }
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::String(s))),
            Some(Token::Int(n)) => Ok(Expr::Literal(Value::from(n))),
            Some(Token::Ident(word)) => match word.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "and" | "or" | "not" | "in" => Err(Error::TemplateSyntax(format!(
                    "unexpected keyword '{}' in expression",
                    word
                ))),
                _ => Ok(Expr::Lookup(word)),
            },
            _ => Err(Error::TemplateSyntax(
                "unexpected end of expression".to_string(),
            )),
        }
    }
}

impl Expr {
    /// Parses an expression, failing with a syntax error on malformed
    /// input. Identifier resolution is deferred to evaluation.
    pub fn parse(source: &str) -> Result<Expr> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(Error::TemplateSyntax("empty expression".to_string()));
        }
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.or_expr()?;
        if parser.pos != parser.tokens.len() {
            return Err(Error::TemplateSyntax(format!(
                "trailing tokens in expression '{}'",
                source
            )));
        }
        Ok(expr)
    }

    fn eval(&self, context: &Context) -> Result<Value> {
        match self {
            Expr::Lookup(key) => lookup(context, key).cloned(),
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Not(inner) => Ok(Value::Bool(!truthy(&inner.eval(context)?))),
            Expr::And(left, right) => {
                let left = left.eval(context)?;
                if truthy(&left) {
                    right.eval(context)
                } else {
                    Ok(left)
                }
            }
            Expr::Or(left, right) => {
                let left = left.eval(context)?;
                if truthy(&left) {
                    Ok(left)
                } else {
                    right.eval(context)
                }
            }
            Expr::Eq(left, right) => {
                Ok(Value::Bool(left.eval(context)? == right.eval(context)?))
            }
            Expr::Ne(left, right) => {
                Ok(Value::Bool(left.eval(context)? != right.eval(context)?))
            }
            Expr::In(needle, haystack) => {
                let needle = needle.eval(context)?;
                match haystack.eval(context)? {
                    Value::String(s) => match needle {
                        Value::String(n) => Ok(Value::Bool(s.contains(&n))),
                        other => Err(Error::Config(format!(
                            "'in' needs a string on the left, got {}",
                            other
                        ))),
                    },
                    Value::Array(items) => Ok(Value::Bool(items.contains(&needle))),
                    other => Err(Error::Config(format!(
                        "'in' needs a string or array on the right, got {}",
                        other
                    ))),
                }
            }
        }
    }

    /// Evaluates the expression against the configuration mapping and
    /// coerces the result to a boolean.
    pub fn test(&self, context: &Context) -> Result<bool> {
        Ok(truthy(&self.eval(context)?))
    }
}
