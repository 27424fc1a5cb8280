//! Parse errors for synchronization status storage values.

use thiserror::Error;

/// Error returned while parsing sync statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sync status: {0}")]
pub struct ParseSyncStatusError(pub String);

/// Error returned while parsing integration types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown integration type: {0}")]
pub struct ParseIntegrationTypeError(pub String);
