use thiserror::Error;

/// Reasons an expression could not be parsed.
///
/// Evaluation never surfaces these; they exist for tooling and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expression does not start with `eval:doc.`")]
    NotAnExpression,

    #[error("unterminated string literal starting at byte {offset}")]
    UnterminatedString { offset: usize },

    #[error("expected a clause at token {position}")]
    ExpectedClause { position: usize },

    #[error("unexpected `{found}` at token {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("missing closing parenthesis")]
    UnclosedGroup,
}
