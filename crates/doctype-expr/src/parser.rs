//! Recursive-descent parser for dependency conditions.
//!
//! ```text
//! chain   := clause (("&&" | "||") clause)*
//! clause  := "(" chain ")" | operand? (("==" | "!=") operand?)?
//! operand := WORD | QUOTED
//! ```
//!
//! Chains fold left to right in textual order.

use crate::ast::{CompareOp, Expr, Operand};
use crate::error::ParseError;
use crate::lexer::Token;

pub struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse the whole token stream as one chain.
    pub fn parse(mut self) -> Result<Expr, ParseError> {
        let expr = self.chain()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => Err(ParseError::UnexpectedToken {
                found: token.to_string(),
                position: self.position,
            }),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn bump(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn chain(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.clause()?;
        loop {
            let and = match self.peek() {
                Some(Token::And) => true,
                Some(Token::Or) => false,
                _ => return Ok(expr),
            };
            self.bump();
            let rhs = self.clause()?;
            expr = if and {
                Expr::And(Box::new(expr), Box::new(rhs))
            } else {
                Expr::Or(Box::new(expr), Box::new(rhs))
            };
        }
    }

    fn clause(&mut self) -> Result<Expr, ParseError> {
        if let Some(Token::LParen) = self.peek() {
            self.bump();
            let inner = self.chain()?;
            return match self.bump() {
                Some(Token::RParen) => Ok(inner),
                _ => Err(ParseError::UnclosedGroup),
            };
        }

        let lhs = match self.peek() {
            Some(Token::Word(word)) => {
                self.bump();
                Some(Operand::Field(word.clone()))
            }
            Some(Token::Quoted(text)) => {
                self.bump();
                Some(Operand::Literal(text.clone()))
            }
            _ => None,
        };

        let op = match self.peek() {
            Some(Token::Eq) => Some(CompareOp::Eq),
            Some(Token::Ne) => Some(CompareOp::Ne),
            _ => None,
        };

        let Some(op) = op else {
            return match lhs {
                Some(Operand::Field(word)) => Ok(bare_word(word)),
                Some(Operand::Literal(text)) => Ok(Expr::Literal(!text.is_empty())),
                None => Err(ParseError::ExpectedClause {
                    position: self.position,
                }),
            };
        };
        self.bump();

        let rhs = match self.peek() {
            Some(Token::Word(word)) => {
                self.bump();
                Operand::Literal(word.clone())
            }
            Some(Token::Quoted(text)) => {
                self.bump();
                Operand::Literal(text.clone())
            }
            _ => Operand::Literal(String::new()),
        };

        Ok(Expr::Compare {
            op,
            lhs: lhs.unwrap_or_else(|| Operand::Field(String::new())),
            rhs,
        })
    }
}

fn bare_word(word: String) -> Expr {
    match word.as_str() {
        "true" => Expr::Literal(true),
        "false" => Expr::Literal(false),
        _ => Expr::FieldRef(word),
    }
}
