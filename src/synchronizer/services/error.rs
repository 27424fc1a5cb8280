//! Errors surfaced by synchronizers.

use crate::card::CardId;
use crate::retry::domain::CapturedError;
use crate::sync_status::{domain::IntegrationType, services::SyncStatusServiceError};
use thiserror::Error;

/// Failure of a synchronizer while handling one event.
#[derive(Debug, Error)]
pub enum SynchronizerError {
    /// The external service call failed after the retry policy gave up.
    #[error("{integration} synchronization failed for card {entity_id}: {source}")]
    External {
        /// Integration whose call failed.
        integration: IntegrationType,
        /// Card being synchronized.
        entity_id: CardId,
        /// Last error reported by the external service.
        #[source]
        source: CapturedError,
    },
    /// Status bookkeeping failed.
    #[error(transparent)]
    Status(#[from] SyncStatusServiceError),
}

impl SynchronizerError {
    /// Returns the captured external failure, if any.
    #[must_use]
    pub const fn external_failure(&self) -> Option<&CapturedError> {
        match self {
            Self::External { source, .. } => Some(source),
            Self::Status(_) => None,
        }
    }
}

/// Result type for synchronizer operations.
pub type SynchronizerResult<T> = Result<T, SynchronizerError>;
