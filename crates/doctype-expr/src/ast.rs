use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    Eq,
    Ne,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }
}

/// One side of a comparison.
///
/// Left-hand words name fields; right-hand words are literal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Operand {
    Field(String),
    Literal(String),
}

/// Parsed dependency expression.
///
/// `And`/`Or` chains are left-deep: `a && b || c` is `Or(And(a, b), c)`.
/// There is no precedence between the two connectives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expr {
    Literal(bool),
    /// Bare word inside a chain that has a comparison elsewhere. Always true.
    FieldRef(String),
    Compare {
        op: CompareOp,
        lhs: Operand,
        rhs: Operand,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Field(name) => f.write_str(name),
            Operand::Literal(text) => write!(f, "'{text}'"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::FieldRef(name) => write!(f, "{name}"),
            Expr::Compare { op, lhs, rhs } => write!(f, "{lhs} {} {rhs}", op.as_str()),
            Expr::And(lhs, rhs) => write!(f, "({lhs} && {rhs})"),
            Expr::Or(lhs, rhs) => write!(f, "({lhs} || {rhs})"),
        }
    }
}
