//! Editor errors reported to the presentation layer.
//!
//! None of these are fatal: the session stays usable after any of them, and
//! an operation that fails leaves the model exactly as it was.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::Serialize;

use crate::import::ImportError;

/// Coarse failure category shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Import,
    RemoteFailure,
}

impl ErrorKind {
    /// The serialized name, for hosts that report kinds as plain strings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Import => "import",
            Self::RemoteFailure => "remote_failure",
        }
    }
}

/// Errors produced by editor session operations.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The caller supplied invalid input, such as a blank prompt.
    #[error("{0}")]
    Validation(String),

    /// SVG text could not be parsed as a document.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// The generation collaborator reported an error or was unreachable.
    #[error("generation failed: {0}")]
    RemoteFailure(String),
}

impl EditorError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Import(_) => ErrorKind::Import,
            Self::RemoteFailure(_) => ErrorKind::RemoteFailure,
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Import(_) => "E_IMPORT",
            Self::RemoteFailure(_) => "E_REMOTE_FAILURE",
        }
    }

    /// Kind, code and message in one serializable value.
    #[must_use]
    pub fn report(&self) -> ErrorReport {
        ErrorReport { kind: self.kind(), code: self.error_code(), message: self.to_string() }
    }
}

/// Structured failure for hosts: what went wrong and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub code: &'static str,
    pub message: String,
}
