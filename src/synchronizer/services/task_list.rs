//! Task list synchronizer.

use super::error::SynchronizerResult;
use super::runner::SyncRunner;
use crate::card::CardId;
use crate::event::domain::{DomainEvent, EventKind, TrackedField};
use crate::retry::domain::FailureKind;
use crate::sync_status::{domain::IntegrationType, ports::SyncStatusRepository};
use crate::synchronizer::{
    domain::ExternalTask,
    ports::{ExternalServiceError, ExternalServiceResult, TaskListService},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Dispatch priority of the task list synchronizer.
pub const TASK_LIST_PRIORITY: i32 = 20;

/// List used for cards that do not belong to a named board.
pub const DEFAULT_TASK_LIST: &str = "Inbox";

const NAME: &str = "task_list";

/// Mirrors scheduled cards as tasks in an external task list.
///
/// Column moves are applied as updates touching every field. Each
/// synchronization replaces every linked task with a single fresh one.
pub struct TaskListSynchronizer<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<dyn TaskListService>,
    runner: SyncRunner<R, C>,
    default_list: String,
    priority: i32,
}

impl<R, C> TaskListSynchronizer<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    /// Creates a task list synchronizer with the default list and priority.
    #[must_use]
    pub fn new(tasks: Arc<dyn TaskListService>, runner: SyncRunner<R, C>) -> Self {
        Self {
            tasks,
            runner,
            default_list: DEFAULT_TASK_LIST.to_owned(),
            priority: TASK_LIST_PRIORITY,
        }
    }

    /// Overrides the list used when a card has no board name.
    #[must_use]
    pub fn with_default_list(mut self, list_name: impl Into<String>) -> Self {
        self.default_list = list_name.into();
        self
    }

    /// Overrides the dispatch priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the synchronizer name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        NAME
    }

    /// Returns the dispatch priority.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the list used when a card has no board name.
    #[must_use]
    pub fn default_list(&self) -> &str {
        &self.default_list
    }

    /// Returns the runner used for outcome recording.
    #[must_use]
    pub const fn runner(&self) -> &SyncRunner<R, C> {
        &self.runner
    }

    /// Every lifecycle kind.
    #[must_use]
    pub const fn can_handle(&self, kind: EventKind) -> bool {
        matches!(
            kind,
            EventKind::Scheduled
                | EventKind::Unscheduled
                | EventKind::Updated
                | EventKind::Moved
                | EventKind::Deleted
        )
    }

    /// Applies `event` to the task list.
    ///
    /// # Errors
    ///
    /// Returns [`super::SynchronizerError`] when the task list call or
    /// status bookkeeping fails.
    pub async fn handle(&self, event: &DomainEvent) -> SynchronizerResult<()> {
        let entity_id = event.entity_id();
        let scheduled = event.card().is_scheduled();
        match event.kind() {
            EventKind::Scheduled => self.replace(event).await,
            EventKind::Updated | EventKind::Moved
                if scheduled && event.requires_external_sync() =>
            {
                self.replace(event).await
            }
            EventKind::Updated | EventKind::Moved
                if !scheduled && event.is_field_changed(TrackedField::ScheduledDate) =>
            {
                self.remove_linked(entity_id).await
            }
            EventKind::Unscheduled => self.remove_linked(entity_id).await,
            EventKind::Deleted => {
                self.remove_linked(entity_id).await?;
                self.runner
                    .forget(entity_id, IntegrationType::TaskList)
                    .await?;
                Ok(())
            }
            EventKind::Updated | EventKind::Moved => {
                debug!(card_id = %entity_id, kind = %event.kind(), "no task list change needed");
                Ok(())
            }
        }
    }

    async fn replace(&self, event: &DomainEvent) -> SynchronizerResult<()> {
        let entity_id = event.entity_id();
        let task_id = self
            .runner
            .push(entity_id, IntegrationType::TaskList, "task_list.replace_task", || {
                self.replace_task(event)
            })
            .await?;
        info!(card_id = %entity_id, task_id, kind = %event.kind(), "task synchronized");
        Ok(())
    }

    async fn remove_linked(&self, entity_id: CardId) -> SynchronizerResult<()> {
        let removed = self
            .runner
            .cleanup(entity_id, IntegrationType::TaskList, "task_list.delete_tasks", || {
                self.delete_linked(entity_id)
            })
            .await?;
        debug!(card_id = %entity_id, removed, "linked tasks removed");
        Ok(())
    }

    async fn replace_task(&self, event: &DomainEvent) -> ExternalServiceResult<String> {
        let card = event.card();
        let task = ExternalTask::for_card(card, &self.default_list).ok_or_else(|| {
            ExternalServiceError::new(
                FailureKind::InvalidArgument,
                format!("card {} has no scheduled date", card.id()),
            )
        })?;
        self.delete_linked(card.id()).await?;
        self.tasks.create_task(&task).await
    }

    async fn delete_linked(&self, entity_id: CardId) -> ExternalServiceResult<u64> {
        let mut removed = 0_u64;
        for linked in self.tasks.tasks_for_entity(entity_id).await? {
            if let Some(id) = linked.id()
                && self.tasks.delete_task(id).await?
            {
                removed = removed.saturating_add(1);
            }
        }
        Ok(removed)
    }
}
