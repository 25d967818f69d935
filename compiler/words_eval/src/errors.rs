//! Error types for evaluation.
//!
//! `EvalErrorKind` provides typed error categories so callers can match on
//! the failure instead of parsing messages. Factory functions (e.g.
//! `object_not_found()`) are the public way to build errors.
//!
//! Every error optionally carries the source line of the node that raised
//! it. The line is attached by the evaluator at the innermost node boundary
//! and never overwritten on the way out.

use std::fmt;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("object {name} already exists and cannot be created again")]
    ObjectAlreadyExists { name: String },

    #[error("object {name} does not exist or is not in scope")]
    ObjectNotFound { name: String },

    #[error("class {name} already exists")]
    ClassAlreadyExists { name: String },

    /// Also raised for an unknown parent at class creation.
    #[error("class {name} does not exist")]
    ClassNotFound { name: String },

    #[error("expected {expected}, received {received}")]
    InvalidType { expected: String, received: String },

    #[error("class {class} has no action named {action}")]
    ActionNotFound { class: String, action: String },

    #[error("action expansion did not settle within {limit} steps")]
    ExpansionLimit { limit: usize },

    /// A node that needs an inherited context was evaluated without one.
    ///
    /// The grammar never produces such a tree; seeing this is a defect in
    /// the producer, not in the user's program.
    #[error("{node} can only be evaluated inside {context}")]
    MissingContext {
        node: &'static str,
        context: &'static str,
    },

    /// An internal invariant was violated.
    #[error("internal invariant violated: {message}")]
    Invariant { message: String },

    /// Catch-all for errors without a structured category.
    #[error("{message}")]
    Custom { message: String },
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Source line of the node that raised the error, if known.
    pub line: Option<u32>,
}

impl EvalError {
    /// Create an error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    pub fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError { kind, line: None }
    }

    /// Attach a source line unless one is already present.
    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        if self.line.is_none() && line != 0 {
            self.line = Some(line);
        }
        self
    }

    /// Human-readable message without the line prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Whether this error indicates a defect rather than a user mistake.
    pub fn is_internal(&self) -> bool {
        matches!(
            self.kind,
            EvalErrorKind::MissingContext { .. } | EvalErrorKind::Invariant { .. }
        )
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::from_kind(kind)
    }
}

// World registry errors

pub fn object_already_exists(name: &str) -> EvalError {
    EvalErrorKind::ObjectAlreadyExists {
        name: name.to_string(),
    }
    .into()
}

pub fn object_not_found(name: &str) -> EvalError {
    EvalErrorKind::ObjectNotFound {
        name: name.to_string(),
    }
    .into()
}

pub fn class_already_exists(name: &str) -> EvalError {
    EvalErrorKind::ClassAlreadyExists {
        name: name.to_string(),
    }
    .into()
}

pub fn class_not_found(name: &str) -> EvalError {
    EvalErrorKind::ClassNotFound {
        name: name.to_string(),
    }
    .into()
}

pub fn action_not_found(class: &str, action: &str) -> EvalError {
    EvalErrorKind::ActionNotFound {
        class: class.to_string(),
        action: action.to_string(),
    }
    .into()
}

// Type errors

pub fn invalid_type(expected: impl fmt::Display, received: impl fmt::Display) -> EvalError {
    EvalErrorKind::InvalidType {
        expected: expected.to_string(),
        received: received.to_string(),
    }
    .into()
}

// Engine errors

pub fn expansion_limit(limit: usize) -> EvalError {
    EvalErrorKind::ExpansionLimit { limit }.into()
}

pub fn missing_context(node: &'static str, context: &'static str) -> EvalError {
    EvalErrorKind::MissingContext { node, context }.into()
}

pub fn invariant(message: impl Into<String>) -> EvalError {
    EvalErrorKind::Invariant {
        message: message.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_includes_line_when_known() {
        let err = object_not_found("alex").with_line(7);
        assert_eq!(
            err.to_string(),
            "line 7: object alex does not exist or is not in scope"
        );
    }

    #[test]
    fn display_without_line() {
        let err = invalid_type("num", "string");
        assert_eq!(err.to_string(), "expected num, received string");
    }

    #[test]
    fn innermost_line_wins() {
        let err = class_not_found("person").with_line(3).with_line(9);
        assert_eq!(err.line, Some(3));
    }

    #[test]
    fn synthesized_line_zero_is_ignored() {
        let err = class_not_found("person").with_line(0).with_line(4);
        assert_eq!(err.line, Some(4));
    }

    #[test]
    fn internal_errors_are_flagged() {
        assert!(missing_context("parameter", "an action definition").is_internal());
        assert!(invariant("bad").is_internal());
        assert!(!object_already_exists("x").is_internal());
    }

    #[test]
    fn kind_is_exposed_as_source() {
        use std::error::Error;
        let err = class_already_exists("person");
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("class person already exists"));
    }
}
