//! Dependency expression evaluation.
//!
//! Expressions follow the `eval:doc.<condition>` form. Anything else, and
//! anything that fails to parse, yields the per-mode default; evaluation
//! itself never fails.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use doctype_model::{DocumentSnapshot, LOGIN_USER_ROLE, UserRoles};

use crate::ast::{CompareOp, Expr, Operand};
use crate::error::ParseError;
use crate::lexer::tokenize;
use crate::parser::Parser;

/// Prefix every evaluable expression starts with.
pub const EXPRESSION_PREFIX: &str = "eval:doc.";

static EMPTY_DOCUMENT: LazyLock<DocumentSnapshot> = LazyLock::new(DocumentSnapshot::new);

/// Which field attribute an expression decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyMode {
    Visibility,
    Mandatory,
    ReadOnly,
}

impl DependencyMode {
    /// Result used when there is no usable expression.
    pub fn default_value(self, base_required: bool) -> bool {
        match self {
            DependencyMode::Visibility => true,
            DependencyMode::Mandatory => base_required,
            DependencyMode::ReadOnly => false,
        }
    }
}

/// A parsed `eval:doc.` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    source: String,
    condition: String,
    tree: Expr,
}

impl Expression {
    /// Parse a raw expression string.
    ///
    /// The `eval:doc.` prefix is removed, then every remaining `doc.` and `;`.
    /// A condition without `==` or `!=` becomes `<condition> != ""`.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let condition = prepare_condition(raw).ok_or(ParseError::NotAnExpression)?;
        let tokens = tokenize(&condition)?;
        let tree = Parser::new(&tokens).parse()?;
        Ok(Self {
            source: raw.to_string(),
            condition,
            tree,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The condition text after prefix stripping and rewriting.
    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn tree(&self) -> &Expr {
        &self.tree
    }

    pub fn evaluate(&self, doc: &DocumentSnapshot, roles: &UserRoles) -> bool {
        eval_expr(&self.tree, doc, roles)
    }
}

fn prepare_condition(raw: &str) -> Option<String> {
    let rest = raw.strip_prefix(EXPRESSION_PREFIX)?;
    let mut condition = rest.replace(';', "").replace("doc.", "").trim().to_string();
    if !(condition.contains("==") || condition.contains("!=")) {
        condition.push_str(" != \"\"");
    }
    Some(condition)
}

/// Evaluate `expr` against `doc` for the given mode.
///
/// `base_required` is the field's static requirement, returned as the
/// `Mandatory` default. `roles` resolves the `login_user_role` pseudo-field.
pub fn evaluate(
    expr: Option<&str>,
    doc: Option<&DocumentSnapshot>,
    mode: DependencyMode,
    base_required: bool,
    roles: &UserRoles,
) -> bool {
    let fallback = mode.default_value(base_required);
    let Some(raw) = expr.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return fallback;
    };
    if !raw.starts_with(EXPRESSION_PREFIX) {
        trace!(expr = raw, ?mode, "not an eval expression, using default");
        return fallback;
    }
    let parsed = match Expression::parse(raw) {
        Ok(parsed) => parsed,
        Err(error) => {
            debug!(expr = raw, ?mode, %error, "unparseable expression, using default");
            return fallback;
        }
    };
    let result = parsed.evaluate(doc.unwrap_or(&EMPTY_DOCUMENT), roles);
    trace!(expr = raw, ?mode, result, "evaluated expression");
    result
}

fn eval_expr(expr: &Expr, doc: &DocumentSnapshot, roles: &UserRoles) -> bool {
    match expr {
        Expr::Literal(value) => *value,
        Expr::FieldRef(_) => true,
        Expr::Compare { op, lhs, rhs } => compare(*op, lhs, rhs, doc, roles),
        Expr::And(lhs, rhs) => {
            let left = eval_expr(lhs, doc, roles);
            let right = eval_expr(rhs, doc, roles);
            left && right
        }
        Expr::Or(lhs, rhs) => {
            let left = eval_expr(lhs, doc, roles);
            let right = eval_expr(rhs, doc, roles);
            left || right
        }
    }
}

fn compare(
    op: CompareOp,
    lhs: &Operand,
    rhs: &Operand,
    doc: &DocumentSnapshot,
    roles: &UserRoles,
) -> bool {
    if let Operand::Field(name) = lhs
        && name == LOGIN_USER_ROLE
    {
        let Some(role) = operand_text(rhs, doc) else {
            return false;
        };
        let present = roles.contains(role.trim());
        return match op {
            CompareOp::Eq => present,
            CompareOp::Ne => !present,
        };
    }

    // An unset field fails the clause whatever the operator.
    let (Some(left), Some(right)) = (operand_text(lhs, doc), operand_text(rhs, doc)) else {
        return false;
    };
    let equal = normalize(&left) == normalize(&right);
    match op {
        CompareOp::Eq => equal,
        CompareOp::Ne => !equal,
    }
}

fn operand_text(operand: &Operand, doc: &DocumentSnapshot) -> Option<String> {
    match operand {
        Operand::Literal(text) => Some(text.clone()),
        Operand::Field(name) => doc
            .text(name)
            .map(|value| value.replace(['\'', '"'], "").trim().to_string()),
    }
}

fn normalize(value: &str) -> &str {
    match value {
        "true" | "1" => "true",
        "false" | "0" => "false",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_strips_prefix_and_rewrites_bare_condition() {
        assert_eq!(prepare_condition("eval:doc.status").unwrap(), "status != \"\"");
        assert_eq!(
            prepare_condition("eval:doc.a == 1 && doc.b != 2;").unwrap(),
            "a == 1 && b != 2"
        );
        assert_eq!(prepare_condition("status"), None);
    }

    #[test]
    fn normalize_boolean_like_values() {
        assert_eq!(normalize("1"), "true");
        assert_eq!(normalize("0"), "false");
        assert_eq!(normalize("false"), "false");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("Yes"), "Yes");
    }

    #[test]
    fn default_values_per_mode() {
        assert!(DependencyMode::Visibility.default_value(false));
        assert!(DependencyMode::Mandatory.default_value(true));
        assert!(!DependencyMode::Mandatory.default_value(false));
        assert!(!DependencyMode::ReadOnly.default_value(true));
    }

    #[test]
    fn expression_keeps_rewritten_condition() {
        let parsed = Expression::parse("eval:doc.customer").unwrap();
        assert_eq!(parsed.source(), "eval:doc.customer");
        assert_eq!(parsed.condition(), "customer != \"\"");
        assert_eq!(parsed.tree().to_string(), "customer != ''");
    }
}
