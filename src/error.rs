//! Error types for the KQL pipeline.
//!
//! The three stages fail differently: the grammar reports a list of
//! [`SyntaxError`]s (a single parse can surface several, for linter-style
//! display), the builder raises a fatal [`BuildError`] when the CST shape
//! violates the grammar's own contract, and the transpiler raises a
//! [`TranslationError`] when a construct has no lowering in the target
//! dialect. Failures are never partial: no SQL is emitted on error.

use serde::Serialize;
use thiserror::Error;

use crate::parser::Span;

/// A grammar-level diagnostic with a source location.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message} at {}..{}", span.start, span.end)]
pub struct SyntaxError {
    pub span: Span,
    pub message: String,
}

impl SyntaxError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// The CST handed to the builder did not have the shape the grammar
/// promises. This is a parser/builder lock-step defect, not a user error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BuildError {
    pub message: String,
}

impl BuildError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// A required child node was absent.
    pub fn missing(parent: &str, child: &str) -> Self {
        Self::new(format!("{parent} missing {child}"))
    }

    /// A node kind appeared where the grammar does not produce it.
    pub fn unexpected(context: &str, kind: &str) -> Self {
        Self::new(format!("unexpected {kind} node in {context}"))
    }
}

/// The AST is well-formed but cannot be lowered to the target SQL dialect,
/// or requires information (such as schema metadata) that was not supplied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TranslationError {
    pub message: String,
}

impl TranslationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn unsupported(what: &str) -> Self {
        Self::new(format!("{what} is not supported"))
    }
}

/// Top-level error for the whole text-to-SQL pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KqlError {
    #[error("{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Syntax(Vec<SyntaxError>),

    #[error("query translation failed: {0}")]
    Build(#[from] BuildError),

    #[error("query translation failed: {0}")]
    Translation(#[from] TranslationError),
}

/// Result alias used across the crate boundary.
pub type KqlResult<T> = Result<T, KqlError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Span;

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError::new(Span { start: 4, end: 9 }, "malformed statement");
        assert_eq!(err.to_string(), "malformed statement at 4..9");
    }

    #[test]
    fn test_translation_error_prefix() {
        let err: KqlError = TranslationError::unsupported("named arguments in functions").into();
        assert_eq!(
            err.to_string(),
            "query translation failed: named arguments in functions is not supported"
        );
    }
}
