//! Shared outcome recording for external calls.

use super::error::{SynchronizerError, SynchronizerResult};
use crate::card::CardId;
use crate::retry::{
    domain::{CapturedError, RetryConfig, RetryContext, RetryStrategy},
    services::RetryExecutor,
};
use crate::sync_status::{
    domain::IntegrationType,
    ports::SyncStatusRepository,
    services::SyncStatusService,
};
use crate::synchronizer::ports::ExternalServiceResult;
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Runs external calls under the retry policy and records each outcome
/// in the synchronization status store.
pub struct SyncRunner<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    statuses: SyncStatusService<R, C>,
    executor: RetryExecutor<C>,
    config: RetryConfig,
    clock: Arc<C>,
    max_retries: Option<u32>,
    shutdown: CancellationToken,
}

impl<R, C> SyncRunner<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    /// Creates a runner with an exponential backoff policy.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>, config: RetryConfig) -> Self {
        Self {
            statuses: SyncStatusService::new(repository, Arc::clone(&clock)),
            executor: RetryExecutor::new(RetryStrategy::default(), Arc::clone(&clock)),
            config,
            clock,
            max_retries: None,
            shutdown: CancellationToken::new(),
        }
    }

    /// Replaces the backoff strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.executor = RetryExecutor::new(strategy, Arc::clone(&self.clock));
        self
    }

    /// Sets the retry budget given to rows this runner creates.
    #[must_use]
    pub const fn with_default_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Ties pending backoff waits to `token`; cancelling it interrupts them.
    #[must_use]
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Returns the status service used for bookkeeping.
    #[must_use]
    pub const fn statuses(&self) -> &SyncStatusService<R, C> {
        &self.statuses
    }

    /// Returns the retry policy applied to each call.
    #[must_use]
    pub const fn retry_config(&self) -> &RetryConfig {
        &self.config
    }

    /// Pushes card state to an integration.
    ///
    /// The status row is created first. The operation's return value is
    /// the external artifact identifier recorded with `SYNCED`.
    ///
    /// # Errors
    ///
    /// Returns [`SynchronizerError::External`] after the failure has been
    /// recorded, or [`SynchronizerError::Status`] when bookkeeping fails.
    pub async fn push<F, Fut>(
        &self,
        entity_id: CardId,
        integration: IntegrationType,
        operation_name: &str,
        operation: F,
    ) -> SynchronizerResult<String>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ExternalServiceResult<String>>,
    {
        self.statuses
            .create_status(entity_id, integration, self.max_retries)
            .await?;
        let context = self.context(entity_id, integration, operation_name);
        let result = self.executor.execute(context, operation).await;
        debug!(card_id = %entity_id, integration = %integration, summary = %result.summary(), "retry run finished");
        match result.into_value() {
            Ok(external_id) => {
                self.statuses
                    .mark_synced(entity_id, integration, &external_id)
                    .await?;
                Ok(external_id)
            }
            Err(err) => Err(self.record_failure(entity_id, integration, err).await?),
        }
    }

    /// Removes external artifacts for a card.
    ///
    /// No row is created. On success an existing row drops its external
    /// identifier; a failure is recorded only when a row exists.
    ///
    /// # Errors
    ///
    /// Returns [`SynchronizerError::External`] after the failure has been
    /// recorded, or [`SynchronizerError::Status`] when bookkeeping fails.
    pub async fn cleanup<F, Fut>(
        &self,
        entity_id: CardId,
        integration: IntegrationType,
        operation_name: &str,
        operation: F,
    ) -> SynchronizerResult<u64>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ExternalServiceResult<u64>>,
    {
        let context = self.context(entity_id, integration, operation_name);
        let result = self.executor.execute(context, operation).await;
        debug!(card_id = %entity_id, integration = %integration, summary = %result.summary(), "retry run finished");
        match result.into_value() {
            Ok(removed) => {
                self.statuses.mark_unlinked(entity_id, integration).await?;
                Ok(removed)
            }
            Err(err) => Err(self.record_failure(entity_id, integration, err).await?),
        }
    }

    /// Drops the status row of a deleted card.
    ///
    /// # Errors
    ///
    /// Returns [`SynchronizerError::Status`] when deletion fails.
    pub async fn forget(
        &self,
        entity_id: CardId,
        integration: IntegrationType,
    ) -> SynchronizerResult<bool> {
        Ok(self.statuses.remove_status(entity_id, integration).await?)
    }

    fn context(
        &self,
        entity_id: CardId,
        integration: IntegrationType,
        operation_name: &str,
    ) -> RetryContext {
        RetryContext::new(operation_name, self.config.clone(), &*self.clock)
            .with_entity(entity_id)
            .with_integration(integration)
            .with_cancellation(self.shutdown.child_token())
    }

    async fn record_failure(
        &self,
        entity_id: CardId,
        integration: IntegrationType,
        err: CapturedError,
    ) -> SynchronizerResult<SynchronizerError> {
        if self.config.is_retryable(err.kind()) {
            let granted = self.statuses.mark_for_retry(entity_id, integration).await?;
            warn!(
                card_id = %entity_id,
                integration = %integration,
                error = %err,
                retry_granted = granted,
                "synchronization left for a later retry"
            );
        } else {
            self.statuses
                .mark_error(entity_id, integration, err.message())
                .await?;
        }
        Ok(SynchronizerError::External {
            integration,
            entity_id,
            source: err,
        })
    }
}
