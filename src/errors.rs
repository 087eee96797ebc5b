//! Error types with diagnostic codes using miette
//!
//! Every failure here is a contract violation raised at the point of misuse.
//! None of them are transient, so nothing retries.

use miette::Diagnostic;
use thiserror::Error;

/// Coarse classification of a [`GeomError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Type,
    Value,
    KeyNotFound,
    DuplicateKey,
    EmptyUnion,
}

// ============================================================================
// Geometry Errors
// ============================================================================

/// Errors raised while building or reading the expression graph
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GeomError {
    #[error("{context}: expected {expected}, got {got}")]
    #[diagnostic(code(livesketch::geom::type_kind))]
    Type {
        context: &'static str,
        expected: &'static str,
        got: String,
    },

    #[error("{context}: {message}")]
    #[diagnostic(code(livesketch::geom::value_kind))]
    Value {
        context: &'static str,
        message: String,
    },

    #[error("unknown {attribute} attribute `{key}` on {owner}")]
    #[diagnostic(
        code(livesketch::registry::key_not_found),
        help("iterate the view's keys to see what this shape registers")
    )]
    KeyNotFound {
        attribute: &'static str,
        key: String,
        owner: &'static str,
    },

    #[error("duplicate {attribute} key `{key}` declared by {owner}")]
    #[diagnostic(
        code(livesketch::registry::duplicate_key),
        help("a key or alias may appear once among a type's own declarations")
    )]
    DuplicateKey {
        attribute: &'static str,
        key: String,
        owner: &'static str,
    },

    #[error("union box has no members")]
    #[diagnostic(
        code(livesketch::geom::empty_union),
        help("add at least one member box before reading the union's bounds")
    )]
    EmptyUnion,
}

impl GeomError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeomError::Type { .. } => ErrorKind::Type,
            GeomError::Value { .. } => ErrorKind::Value,
            GeomError::KeyNotFound { .. } => ErrorKind::KeyNotFound,
            GeomError::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            GeomError::EmptyUnion => ErrorKind::EmptyUnion,
        }
    }

    pub(crate) fn type_kind(context: &'static str, expected: &'static str, got: impl Into<String>) -> Self {
        GeomError::Type {
            context,
            expected,
            got: got.into(),
        }
    }

    pub(crate) fn value_kind(context: &'static str, message: impl Into<String>) -> Self {
        GeomError::Value {
            context,
            message: message.into(),
        }
    }
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors that occur while writing rendered shapes to an output stream
#[derive(Error, Diagnostic, Debug)]
pub enum RenderError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Geom(#[from] GeomError),

    #[error("failed to write output: {0}")]
    #[diagnostic(code(livesketch::render::io))]
    Io(#[from] std::io::Error),

    #[error("failed to format output")]
    #[diagnostic(code(livesketch::render::format))]
    Format(#[from] std::fmt::Error),
}
