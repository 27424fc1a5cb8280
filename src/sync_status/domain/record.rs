//! Synchronization status aggregate.

use super::{IntegrationType, SyncStatus, SyncStatusId};
use crate::card::CardId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Retry budget applied when the caller does not choose one.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Message recorded when the retry budget runs out.
const RETRY_BUDGET_EXHAUSTED: &str = "retry budget exhausted";

/// Synchronization state of one card in one external integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationSyncStatus {
    id: Option<SyncStatusId>,
    entity_id: CardId,
    integration_type: IntegrationType,
    external_id: Option<String>,
    status: SyncStatus,
    last_sync_at: Option<DateTime<Utc>>,
    error_message: Option<String>,
    retry_count: u32,
    max_retries: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted status row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSyncStatusData {
    /// Persisted row identifier.
    pub id: SyncStatusId,
    /// Persisted card identifier.
    pub entity_id: CardId,
    /// Persisted integration type.
    pub integration_type: IntegrationType,
    /// Persisted external artifact identifier.
    pub external_id: Option<String>,
    /// Persisted synchronization status.
    pub status: SyncStatus,
    /// Persisted last successful synchronization time.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Persisted last error message.
    pub error_message: Option<String>,
    /// Persisted retry count.
    pub retry_count: u32,
    /// Persisted retry budget.
    pub max_retries: u32,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl IntegrationSyncStatus {
    /// Creates an unsaved `PENDING` row with no retries spent.
    #[must_use]
    pub fn pending(
        entity_id: CardId,
        integration_type: IntegrationType,
        max_retries: u32,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: None,
            entity_id,
            integration_type,
            external_id: None,
            status: SyncStatus::Pending,
            last_sync_at: None,
            error_message: None,
            retry_count: 0,
            max_retries,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a row from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSyncStatusData) -> Self {
        Self {
            id: Some(data.id),
            entity_id: data.entity_id,
            integration_type: data.integration_type,
            external_id: data.external_id,
            status: data.status,
            last_sync_at: data.last_sync_at,
            error_message: data.error_message,
            retry_count: data.retry_count,
            max_retries: data.max_retries,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the row with its storage-assigned identifier.
    #[must_use]
    pub const fn with_id(mut self, id: SyncStatusId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the storage identifier, absent until inserted.
    #[must_use]
    pub const fn id(&self) -> Option<SyncStatusId> {
        self.id
    }

    /// Returns the card identifier.
    #[must_use]
    pub const fn entity_id(&self) -> CardId {
        self.entity_id
    }

    /// Returns the integration type.
    #[must_use]
    pub const fn integration_type(&self) -> IntegrationType {
        self.integration_type
    }

    /// Returns the external artifact identifier, absent until first success.
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Returns the synchronization status.
    #[must_use]
    pub const fn status(&self) -> SyncStatus {
        self.status
    }

    /// Returns the last successful synchronization time.
    #[must_use]
    pub const fn last_sync_at(&self) -> Option<DateTime<Utc>> {
        self.last_sync_at
    }

    /// Returns the last recorded error.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns how many retries have been spent.
    #[must_use]
    pub const fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Returns the retry budget.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` while retry budget remains.
    #[must_use]
    pub const fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }

    /// Returns `true` unless the row is in a permanent error.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.status, SyncStatus::Error) || self.can_retry()
    }

    /// Returns a human-readable status line.
    #[must_use]
    pub fn status_description(&self) -> String {
        match (self.status, self.error_message.as_deref()) {
            (SyncStatus::Retry, _) => format!(
                "{} ({}/{})",
                self.status.description(),
                self.retry_count,
                self.max_retries
            ),
            (SyncStatus::Error, Some(message)) => {
                format!("{}: {message}", self.status.description())
            }
            (status, _) => status.description().to_owned(),
        }
    }

    /// Records a successful synchronization.
    ///
    /// Stores the external identifier, clears the error and starts a fresh
    /// retry budget.
    pub fn mark_synced(&mut self, external_id: impl Into<String>, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.status = SyncStatus::Synced;
        self.external_id = Some(external_id.into());
        self.error_message = None;
        self.retry_count = 0;
        self.last_sync_at = Some(timestamp);
        self.updated_at = timestamp;
    }

    /// Records that the external artifacts were removed.
    ///
    /// The row stays `SYNCED` with no external identifier.
    pub fn mark_unlinked(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.status = SyncStatus::Synced;
        self.external_id = None;
        self.error_message = None;
        self.retry_count = 0;
        self.last_sync_at = Some(timestamp);
        self.updated_at = timestamp;
    }

    /// Records a fatal failure.
    pub fn mark_error(&mut self, message: impl Into<String>, clock: &impl Clock) {
        self.status = SyncStatus::Error;
        self.error_message = Some(message.into());
        self.touch(clock);
    }

    /// Spends one retry from the budget.
    ///
    /// Returns `true` when a retry was granted. The row moves to `RETRY`,
    /// or to `ERROR` when the granted retry was the last one. With the
    /// budget already spent the row moves to `ERROR`, the count is left
    /// unchanged and `false` is returned.
    pub fn mark_for_retry(&mut self, clock: &impl Clock) -> bool {
        if !self.can_retry() {
            self.mark_error(RETRY_BUDGET_EXHAUSTED, clock);
            return false;
        }
        self.retry_count = self.retry_count.saturating_add(1);
        if self.can_retry() {
            self.status = SyncStatus::Retry;
            self.touch(clock);
        } else {
            self.mark_error(RETRY_BUDGET_EXHAUSTED, clock);
        }
        true
    }

    /// Returns the row to `PENDING` with a fresh retry budget.
    pub fn reset_retries(&mut self, clock: &impl Clock) {
        self.retry_count = 0;
        self.status = SyncStatus::Pending;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
