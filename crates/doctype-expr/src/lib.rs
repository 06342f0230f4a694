//! Field dependency expressions.
//!
//! Fields carry small boolean conditions (`depends_on`,
//! `mandatory_depends_on`, `read_only_depends_on`) written as
//! `eval:doc.<condition>`. This crate parses them into a typed tree and
//! evaluates them against a [`DocumentSnapshot`](doctype_model::DocumentSnapshot).
//!
//! ```ignore
//! use doctype_expr::{DependencyMode, evaluate};
//!
//! let visible = evaluate(
//!     Some("eval:doc.status == Open"),
//!     Some(&doc),
//!     DependencyMode::Visibility,
//!     false,
//!     &roles,
//! );
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod state;

pub use ast::{CompareOp, Expr, Operand};
pub use error::ParseError;
pub use eval::{DependencyMode, EXPRESSION_PREFIX, Expression, evaluate};
pub use state::{FieldState, evaluate_field};
