//! Error type shared by external service ports.

use crate::retry::domain::{ClassifiedError, FailureKind};
use thiserror::Error;

/// Result type for external service operations.
pub type ExternalServiceResult<T> = Result<T, ExternalServiceError>;

/// Failure reported by an external service, classified at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({kind})")]
pub struct ExternalServiceError {
    kind: FailureKind,
    message: String,
}

impl ExternalServiceError {
    /// Creates a classified external failure.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ClassifiedError for ExternalServiceError {
    fn failure_kind(&self) -> FailureKind {
        self.kind
    }

    fn failure_message(&self) -> String {
        self.message.clone()
    }
}
