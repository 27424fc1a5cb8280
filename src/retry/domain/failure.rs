//! Failure classification shared by every external call.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Category of a failed operation, decided where the failure happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The remote endpoint could not be reached.
    Connection,
    /// The remote endpoint did not answer in time.
    Timeout,
    /// Local or transport I/O failed.
    Io,
    /// The operation was cancelled before completing.
    Interrupted,
    /// The request was rejected as malformed.
    InvalidArgument,
    /// The remote endpoint does not support the request.
    Unsupported,
    /// Credentials or permissions were refused.
    Security,
    /// Local persistence failed.
    Persistence,
    /// The failure could not be classified.
    Unknown,
}

impl FailureKind {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Timeout => "timeout",
            Self::Io => "io",
            Self::Interrupted => "interrupted",
            Self::InvalidArgument => "invalid_argument",
            Self::Unsupported => "unsupported",
            Self::Security => "security",
            Self::Persistence => "persistence",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that know which [`FailureKind`] they belong to.
pub trait ClassifiedError: std::error::Error {
    /// Returns the failure category used by retry policies.
    fn failure_kind(&self) -> FailureKind;

    /// Returns the bare failure message, without kind decoration.
    fn failure_message(&self) -> String {
        self.to_string()
    }
}

/// Owned copy of a classified failure kept in attempt history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} failure: {message}")]
pub struct CapturedError {
    kind: FailureKind,
    message: String,
}

impl CapturedError {
    /// Creates a captured error from its parts.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Captures the classification and message of a live error.
    #[must_use]
    pub fn capture<E: ClassifiedError + ?Sized>(err: &E) -> Self {
        Self::new(err.failure_kind(), err.failure_message())
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

impl ClassifiedError for CapturedError {
    fn failure_kind(&self) -> FailureKind {
        self.kind
    }

    fn failure_message(&self) -> String {
        self.message.clone()
    }
}
