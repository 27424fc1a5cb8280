//! Synchronization status bookkeeping keyed by (card, integration).
//!
//! Provides [`SyncStatusService`], which creates rows on first use, applies
//! state machine transitions and answers the queries a reconciliation
//! sweep needs.

use crate::card::CardId;
use crate::sync_status::{
    domain::{
        DEFAULT_MAX_RETRIES, IntegrationSyncStatus, IntegrationType, SyncStatistics, SyncStatus,
    },
    ports::{SyncStatusRepository, SyncStatusRepositoryError},
};
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Service-level errors for synchronization status operations.
#[derive(Debug, Error)]
pub enum SyncStatusServiceError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] SyncStatusRepositoryError),
}

/// Result type for synchronization status service operations.
pub type SyncStatusServiceResult<T> = Result<T, SyncStatusServiceError>;

/// Synchronization status orchestration service.
#[derive(Clone)]
pub struct SyncStatusService<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    default_max_retries: u32,
}

impl<R, C> SyncStatusService<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service whose new rows get the default retry budget.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            default_max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Overrides the retry budget given to new rows.
    #[must_use]
    pub const fn with_default_max_retries(mut self, max_retries: u32) -> Self {
        self.default_max_retries = max_retries;
        self
    }

    /// Returns the backing repository.
    #[must_use]
    pub const fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Returns the row for a card and integration, creating a `PENDING`
    /// one when none exists.
    ///
    /// An existing row is returned untouched, whatever `max_retries` says.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when lookup or insert
    /// fails.
    pub async fn create_status(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
        max_retries: Option<u32>,
    ) -> SyncStatusServiceResult<IntegrationSyncStatus> {
        if let Some(existing) = self
            .repository
            .find_by_entity_and_type(entity_id, integration_type)
            .await?
        {
            debug!(card_id = %entity_id, integration = %integration_type, "sync status already exists");
            return Ok(existing);
        }

        let pending = IntegrationSyncStatus::pending(
            entity_id,
            integration_type,
            max_retries.unwrap_or(self.default_max_retries),
            &*self.clock,
        );
        match self.repository.insert(&pending).await {
            Ok(created) => {
                info!(card_id = %entity_id, integration = %integration_type, "sync status created");
                Ok(created)
            }
            Err(SyncStatusRepositoryError::Duplicate { .. }) => {
                // Lost an insert race; the winner's row is the answer.
                self.repository
                    .find_by_entity_and_type(entity_id, integration_type)
                    .await?
                    .ok_or_else(|| {
                        SyncStatusRepositoryError::Duplicate {
                            entity_id,
                            integration_type,
                        }
                        .into()
                    })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Records a successful synchronization.
    ///
    /// Returns `Ok(None)` and logs a warning when no row exists.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when persistence fails.
    pub async fn mark_synced(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
        external_id: &str,
    ) -> SyncStatusServiceResult<Option<IntegrationSyncStatus>> {
        let Some(mut status) = self.existing(entity_id, integration_type).await? else {
            return Ok(None);
        };
        status.mark_synced(external_id, &*self.clock);
        self.repository.update(&status).await?;
        info!(card_id = %entity_id, integration = %integration_type, external_id, "marked synced");
        Ok(Some(status))
    }

    /// Records that the pair's external artifacts were removed.
    ///
    /// Clears the stored external identifier. Untracked pairs are left
    /// alone and yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when persistence fails.
    pub async fn mark_unlinked(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusServiceResult<Option<IntegrationSyncStatus>> {
        let Some(mut status) = self
            .repository
            .find_by_entity_and_type(entity_id, integration_type)
            .await?
        else {
            return Ok(None);
        };
        status.mark_unlinked(&*self.clock);
        self.repository.update(&status).await?;
        debug!(card_id = %entity_id, integration = %integration_type, "external link cleared");
        Ok(Some(status))
    }

    /// Records a fatal failure.
    ///
    /// Returns `Ok(None)` and logs a warning when no row exists.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when persistence fails.
    pub async fn mark_error(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
        message: &str,
    ) -> SyncStatusServiceResult<Option<IntegrationSyncStatus>> {
        let Some(mut status) = self.existing(entity_id, integration_type).await? else {
            return Ok(None);
        };
        status.mark_error(message, &*self.clock);
        self.repository.update(&status).await?;
        warn!(card_id = %entity_id, integration = %integration_type, error = message, "marked error");
        Ok(Some(status))
    }

    /// Spends one retry from the row's budget.
    ///
    /// Returns `false` when no row exists or the budget was already spent;
    /// in the latter case the row is moved to `ERROR`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when persistence fails.
    pub async fn mark_for_retry(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusServiceResult<bool> {
        let Some(mut status) = self.existing(entity_id, integration_type).await? else {
            return Ok(false);
        };
        let granted = status.mark_for_retry(&*self.clock);
        self.repository.update(&status).await?;
        if granted {
            info!(
                card_id = %entity_id,
                integration = %integration_type,
                retry_count = status.retry_count(),
                max_retries = status.max_retries(),
                status = %status.status(),
                "retry scheduled"
            );
        } else {
            warn!(card_id = %entity_id, integration = %integration_type, "retry budget exhausted");
        }
        Ok(granted)
    }

    /// Returns the row to `PENDING` with a fresh retry budget.
    ///
    /// Returns `Ok(None)` and logs a warning when no row exists.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when persistence fails.
    pub async fn reset_retries(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusServiceResult<Option<IntegrationSyncStatus>> {
        let Some(mut status) = self.existing(entity_id, integration_type).await? else {
            return Ok(None);
        };
        status.reset_retries(&*self.clock);
        self.repository.update(&status).await?;
        info!(card_id = %entity_id, integration = %integration_type, "retry budget reset");
        Ok(Some(status))
    }

    /// Returns the row for a card and integration.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when lookup fails.
    pub async fn status(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusServiceResult<Option<IntegrationSyncStatus>> {
        Ok(self
            .repository
            .find_by_entity_and_type(entity_id, integration_type)
            .await?)
    }

    /// Returns every row for a card ordered by integration type.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when lookup fails.
    pub async fn statuses_for_entity(
        &self,
        entity_id: CardId,
    ) -> SyncStatusServiceResult<Vec<IntegrationSyncStatus>> {
        Ok(self.repository.find_by_entity(entity_id).await?)
    }

    /// Returns every row for an integration, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when lookup fails.
    pub async fn statuses_for_integration(
        &self,
        integration_type: IntegrationType,
    ) -> SyncStatusServiceResult<Vec<IntegrationSyncStatus>> {
        Ok(self
            .repository
            .find_by_integration_type(integration_type)
            .await?)
    }

    /// Returns every row in a status, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when lookup fails.
    pub async fn statuses_with_status(
        &self,
        status: SyncStatus,
    ) -> SyncStatusServiceResult<Vec<IntegrationSyncStatus>> {
        Ok(self.repository.find_by_status(status).await?)
    }

    /// Returns `PENDING` and `RETRY` rows with budget left, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when lookup fails.
    pub async fn retry_candidates(&self) -> SyncStatusServiceResult<Vec<IntegrationSyncStatus>> {
        Ok(self.repository.find_retry_candidates().await?)
    }

    /// Returns `ERROR` rows with budget left, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when lookup fails.
    pub async fn error_retry_candidates(
        &self,
    ) -> SyncStatusServiceResult<Vec<IntegrationSyncStatus>> {
        Ok(self.repository.find_error_retry_candidates().await?)
    }

    /// Removes the row for a card and integration.
    ///
    /// Returns `false` when no row existed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when deletion fails.
    pub async fn remove_status(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusServiceResult<bool> {
        let removed = self
            .repository
            .delete_by_entity_and_type(entity_id, integration_type)
            .await?;
        if removed {
            info!(card_id = %entity_id, integration = %integration_type, "sync status removed");
        }
        Ok(removed)
    }

    /// Removes every row for a card and returns how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when deletion fails.
    pub async fn remove_statuses_for_entity(&self, entity_id: CardId) -> SyncStatusServiceResult<u64> {
        let removed = self.repository.delete_by_entity(entity_id).await?;
        info!(card_id = %entity_id, removed, "sync statuses removed for card");
        Ok(removed)
    }

    /// Computes statistics from the persisted rows.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when counting fails.
    pub async fn statistics(&self) -> SyncStatusServiceResult<SyncStatistics> {
        let mut by_status = Vec::with_capacity(SyncStatus::ALL.len());
        for status in SyncStatus::ALL {
            by_status.push((status, self.repository.count_by_status(status).await?));
        }
        let mut by_integration = BTreeMap::new();
        for integration_type in IntegrationType::ALL {
            let count = self
                .repository
                .count_by_integration_type(integration_type)
                .await?;
            by_integration.insert(integration_type, count);
        }
        Ok(SyncStatistics::new(
            by_status,
            by_integration,
            self.clock.utc(),
        ))
    }

    /// Returns `true` when the pair is `SYNCED`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when lookup fails.
    pub async fn is_synced(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusServiceResult<bool> {
        Ok(self
            .status(entity_id, integration_type)
            .await?
            .is_some_and(|status| status.status() == SyncStatus::Synced))
    }

    /// Returns `true` when any integration of the card is in `ERROR`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when lookup fails.
    pub async fn has_sync_errors(&self, entity_id: CardId) -> SyncStatusServiceResult<bool> {
        Ok(self
            .statuses_for_entity(entity_id)
            .await?
            .iter()
            .any(|status| status.status() == SyncStatus::Error))
    }

    /// Returns the external artifact identifier recorded for the pair.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusServiceError::Repository`] when lookup fails.
    pub async fn external_id(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusServiceResult<Option<String>> {
        Ok(self
            .status(entity_id, integration_type)
            .await?
            .and_then(|status| status.external_id().map(str::to_owned)))
    }

    async fn existing(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusServiceResult<Option<IntegrationSyncStatus>> {
        let status = self
            .repository
            .find_by_entity_and_type(entity_id, integration_type)
            .await?;
        if status.is_none() {
            warn!(card_id = %entity_id, integration = %integration_type, "no sync status to update");
        }
        Ok(status)
    }
}
