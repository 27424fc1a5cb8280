//! Repository port for synchronization status rows.

use crate::card::CardId;
use crate::sync_status::domain::{IntegrationSyncStatus, IntegrationType, SyncStatus, SyncStatusId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for synchronization status repository operations.
pub type SyncStatusRepositoryResult<T> = Result<T, SyncStatusRepositoryError>;

/// Synchronization status persistence contract.
///
/// Rows are unique per (card, integration).
#[async_trait]
pub trait SyncStatusRepository: Send + Sync {
    /// Inserts a new row and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusRepositoryError::Duplicate`] when a row already
    /// exists for the same card and integration.
    async fn insert(
        &self,
        status: &IntegrationSyncStatus,
    ) -> SyncStatusRepositoryResult<IntegrationSyncStatus>;

    /// Persists changes to an existing row.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusRepositoryError::Unpersisted`] when the row has no
    /// identifier or [`SyncStatusRepositoryError::NotFound`] when it no
    /// longer exists.
    async fn update(&self, status: &IntegrationSyncStatus) -> SyncStatusRepositoryResult<()>;

    /// Finds a row by identifier.
    async fn find_by_id(
        &self,
        id: SyncStatusId,
    ) -> SyncStatusRepositoryResult<Option<IntegrationSyncStatus>>;

    /// Finds the row for a card and integration.
    async fn find_by_entity_and_type(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusRepositoryResult<Option<IntegrationSyncStatus>>;

    /// Returns every row for a card ordered by integration type.
    async fn find_by_entity(
        &self,
        entity_id: CardId,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>>;

    /// Returns every row for an integration, newest first.
    async fn find_by_integration_type(
        &self,
        integration_type: IntegrationType,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>>;

    /// Returns every row in a status, most recently updated first.
    async fn find_by_status(
        &self,
        status: SyncStatus,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>>;

    /// Returns `PENDING` and `RETRY` rows with budget left, oldest update
    /// first.
    async fn find_retry_candidates(&self) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>>;

    /// Returns `ERROR` rows with budget left, oldest update first.
    async fn find_error_retry_candidates(
        &self,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>>;

    /// Deletes every row for a card and returns how many were removed.
    async fn delete_by_entity(&self, entity_id: CardId) -> SyncStatusRepositoryResult<u64>;

    /// Deletes the row for a card and integration.
    ///
    /// Returns `false` when no row existed.
    async fn delete_by_entity_and_type(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusRepositoryResult<bool>;

    /// Counts rows in a status.
    async fn count_by_status(&self, status: SyncStatus) -> SyncStatusRepositoryResult<u64>;

    /// Counts rows for an integration.
    async fn count_by_integration_type(
        &self,
        integration_type: IntegrationType,
    ) -> SyncStatusRepositoryResult<u64>;
}

/// Hook that makes sure status storage exists before it is used.
///
/// Implementations must be idempotent and cheap; the coordinator calls it
/// before every lifecycle operation.
#[async_trait]
pub trait SyncStorageInitializer: Send + Sync {
    /// Creates the status storage when missing.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusRepositoryError::Persistence`] when storage cannot
    /// be prepared.
    async fn ensure_sync_status_storage(&self) -> SyncStatusRepositoryResult<()>;
}

/// Errors returned by synchronization status repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SyncStatusRepositoryError {
    /// A row already exists for the card and integration.
    #[error("sync status already exists for card {entity_id} in {integration_type}")]
    Duplicate {
        /// Card identifier.
        entity_id: CardId,
        /// Integration type.
        integration_type: IntegrationType,
    },

    /// The row was not found.
    #[error("sync status not found: {0}")]
    NotFound(SyncStatusId),

    /// The row has not been inserted yet.
    #[error("sync status for card {0} has not been persisted")]
    Unpersisted(CardId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SyncStatusRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
