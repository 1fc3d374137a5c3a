use std::fmt;

use thiserror::Error;

/// Failures surfaced by ingestion, activation and vector operations.
#[derive(Debug, Error)]
pub enum MlcError {
    /// Absent or empty inputs, zero rank, zero-sized dimensions, or an
    /// array that was released or never initialised.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operand sizes disagree in a binary or ternary operation.
    #[error("size mismatch: expected {expected} elements, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    /// Allocation or growth of array storage failed.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Unreadable, empty or inconsistent tabular input.
    #[error("malformed source '{source_name}': {reason}")]
    MalformedSource { source_name: String, reason: String },
}

/// Coarse failure category, so callers can branch on cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    ShapeMismatch,
    ResourceExhausted,
    MalformedSource,
}

impl MlcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MlcError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            MlcError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            MlcError::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
            MlcError::MalformedSource { .. } => ErrorKind::MalformedSource,
        }
    }

    pub(crate) fn malformed(source_name: &str, reason: impl Into<String>) -> Self {
        MlcError::MalformedSource {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "invalid argument"),
            ErrorKind::ShapeMismatch => write!(f, "shape mismatch"),
            ErrorKind::ResourceExhausted => write!(f, "resource exhausted"),
            ErrorKind::MalformedSource => write!(f, "malformed source"),
        }
    }
}
