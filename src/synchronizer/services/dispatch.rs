//! Closed set of synchronizers known to the publisher.

use super::calendar::CalendarSynchronizer;
use super::error::SynchronizerResult;
use super::task_list::TaskListSynchronizer;
use crate::event::domain::{DomainEvent, EventKind};
use crate::sync_status::{domain::IntegrationType, ports::SyncStatusRepository};
use mockable::Clock;

/// A synchronizer the event publisher can dispatch to.
pub enum Synchronizer<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    /// Calendar integration.
    Calendar(CalendarSynchronizer<R, C>),
    /// Task list integration.
    TaskList(TaskListSynchronizer<R, C>),
}

impl<R, C> Synchronizer<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    /// Unique name used for subscription bookkeeping.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Calendar(inner) => inner.name(),
            Self::TaskList(inner) => inner.name(),
        }
    }

    /// Dispatch priority; lower runs first.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        match self {
            Self::Calendar(inner) => inner.priority(),
            Self::TaskList(inner) => inner.priority(),
        }
    }

    /// Integration whose status rows this synchronizer maintains.
    #[must_use]
    pub const fn integration_type(&self) -> IntegrationType {
        match self {
            Self::Calendar(_) => IntegrationType::Calendar,
            Self::TaskList(_) => IntegrationType::TaskList,
        }
    }

    /// Returns `true` when events of `kind` should reach this synchronizer.
    #[must_use]
    pub const fn can_handle(&self, kind: EventKind) -> bool {
        match self {
            Self::Calendar(inner) => inner.can_handle(kind),
            Self::TaskList(inner) => inner.can_handle(kind),
        }
    }

    /// Handles one event.
    ///
    /// # Errors
    ///
    /// Propagates the wrapped synchronizer's error.
    pub async fn handle(&self, event: &DomainEvent) -> SynchronizerResult<()> {
        match self {
            Self::Calendar(inner) => inner.handle(event).await,
            Self::TaskList(inner) => inner.handle(event).await,
        }
    }
}

impl<R, C> From<CalendarSynchronizer<R, C>> for Synchronizer<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    fn from(value: CalendarSynchronizer<R, C>) -> Self {
        Self::Calendar(value)
    }
}

impl<R, C> From<TaskListSynchronizer<R, C>> for Synchronizer<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    fn from(value: TaskListSynchronizer<R, C>) -> Self {
        Self::TaskList(value)
    }
}
