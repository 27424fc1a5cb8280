//! Assembly of the synchronization engine from configuration.

use crate::config::SyncEngineConfig;
use crate::coordinator::services::IntegrationCoordinator;
use crate::event::services::EventPublisher;
use crate::retry::domain::RetryConfig;
use crate::sync_status::{
    domain::SyncStatistics,
    ports::{SyncStatusRepository, SyncStorageInitializer},
    services::{SyncStatusService, SyncStatusServiceResult},
};
use crate::synchronizer::{
    ports::{CalendarService, TaskListService},
    services::{CalendarSynchronizer, SyncRunner, TaskListSynchronizer},
};
use mockable::Clock;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Wired engine: status store, publisher, synchronizers and coordinator.
///
/// The repository doubles as the storage initializer the coordinator
/// calls before each lifecycle operation.
pub struct SyncEngine<R, C>
where
    R: SyncStatusRepository + SyncStorageInitializer,
    C: Clock + Send + Sync,
{
    config: SyncEngineConfig,
    repository: Arc<R>,
    clock: Arc<C>,
    statuses: SyncStatusService<R, C>,
    publisher: Arc<EventPublisher<R, C>>,
    coordinator: IntegrationCoordinator<R, C, R>,
    shutdown: CancellationToken,
}

impl<R, C> SyncEngine<R, C>
where
    R: SyncStatusRepository + SyncStorageInitializer,
    C: Clock + Send + Sync,
{
    /// Creates an engine with no integrations subscribed.
    #[must_use]
    pub fn new(config: SyncEngineConfig, repository: Arc<R>, clock: Arc<C>) -> Self {
        let publisher = Arc::new(EventPublisher::new());
        let coordinator = IntegrationCoordinator::new(Arc::clone(&repository), Arc::clone(&clock))
            .with_publisher(Arc::clone(&publisher));
        let statuses = SyncStatusService::new(Arc::clone(&repository), Arc::clone(&clock))
            .with_default_max_retries(config.default_max_retries);
        Self {
            config,
            repository,
            clock,
            statuses,
            publisher,
            coordinator,
            shutdown: CancellationToken::new(),
        }
    }

    /// Subscribes a calendar synchronizer backed by `calendar`.
    #[must_use]
    pub fn with_calendar(self, calendar: Arc<dyn CalendarService>) -> Self {
        let synchronizer = CalendarSynchronizer::new(calendar, self.runner())
            .with_priority(self.config.calendar_priority);
        if self.publisher.subscribe(synchronizer) {
            info!(priority = self.config.calendar_priority, "calendar integration enabled");
        } else {
            warn!("calendar integration already enabled");
        }
        self
    }

    /// Subscribes a task list synchronizer backed by `tasks`.
    #[must_use]
    pub fn with_task_list(self, tasks: Arc<dyn TaskListService>) -> Self {
        let synchronizer = TaskListSynchronizer::new(tasks, self.runner())
            .with_default_list(self.config.default_task_list.clone())
            .with_priority(self.config.task_list_priority);
        if self.publisher.subscribe(synchronizer) {
            info!(
                priority = self.config.task_list_priority,
                default_list = %self.config.default_task_list,
                "task list integration enabled"
            );
        } else {
            warn!("task list integration already enabled");
        }
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &SyncEngineConfig {
        &self.config
    }

    /// Returns the retry policy synchronizers run under.
    #[must_use]
    pub fn retry_config(&self) -> RetryConfig {
        self.config.retry.to_retry_config()
    }

    /// Returns the lifecycle entry point.
    #[must_use]
    pub const fn coordinator(&self) -> &IntegrationCoordinator<R, C, R> {
        &self.coordinator
    }

    /// Returns the publisher synchronizers are subscribed to.
    #[must_use]
    pub const fn publisher(&self) -> &Arc<EventPublisher<R, C>> {
        &self.publisher
    }

    /// Returns the status service for queries and manual resets.
    #[must_use]
    pub const fn statuses(&self) -> &SyncStatusService<R, C> {
        &self.statuses
    }

    /// Computes statistics over persisted status rows.
    ///
    /// # Errors
    ///
    /// Returns [`crate::sync_status::services::SyncStatusServiceError`]
    /// when the repository cannot be read.
    pub async fn statistics(&self) -> SyncStatusServiceResult<SyncStatistics> {
        self.statuses.statistics().await
    }

    /// Interrupts every pending retry wait.
    pub fn shutdown(&self) {
        info!("sync engine shutting down");
        self.shutdown.cancel();
    }

    /// Returns `true` once [`Self::shutdown`] has been called.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn runner(&self) -> SyncRunner<R, C> {
        SyncRunner::new(
            Arc::clone(&self.repository),
            Arc::clone(&self.clock),
            self.retry_config(),
        )
        .with_strategy(self.config.retry.strategy)
        .with_default_max_retries(self.config.default_max_retries)
        .with_shutdown(self.shutdown.child_token())
    }
}
