//! Card lifecycle coordinator.

use super::counters::IntegrationCounters;
use crate::card::{CardId, CardSnapshot, ColumnId};
use crate::coordinator::domain::IntegrationStats;
use crate::event::{
    domain::{DomainEvent, EventKind},
    services::{DispatchReport, EventPublisher, PublishError},
};
use crate::sync_status::ports::{
    SyncStatusRepository, SyncStatusRepositoryError, SyncStorageInitializer,
};
use chrono::NaiveDateTime;
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Stage of a lifecycle operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrationPhase {
    /// Making sure status storage exists.
    StoragePreparation,
    /// Delivering the event to synchronizers.
    Publication,
}

impl IntegrationPhase {
    /// Returns a stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StoragePreparation => "storage_preparation",
            Self::Publication => "publication",
        }
    }
}

impl fmt::Display for IntegrationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Underlying cause of an [`IntegrationError`].
#[derive(Debug, Error)]
pub enum IntegrationFailure {
    /// Status storage could not be prepared.
    #[error(transparent)]
    Storage(#[from] SyncStatusRepositoryError),
    /// One or more synchronizers failed.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl IntegrationFailure {
    /// Returns the phase this failure belongs to.
    #[must_use]
    pub const fn phase(&self) -> IntegrationPhase {
        match self {
            Self::Storage(_) => IntegrationPhase::StoragePreparation,
            Self::Publish(_) => IntegrationPhase::Publication,
        }
    }
}

/// A lifecycle operation that could not be integrated.
#[derive(Debug, Error)]
#[error("{kind} integration for card {entity_id} failed during {}: {source}", .source.phase())]
pub struct IntegrationError {
    entity_id: CardId,
    kind: EventKind,
    #[source]
    source: IntegrationFailure,
}

impl IntegrationError {
    /// Returns the card whose transition failed.
    #[must_use]
    pub const fn entity_id(&self) -> CardId {
        self.entity_id
    }

    /// Returns the kind of event that was being integrated.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Returns the stage that failed.
    #[must_use]
    pub const fn phase(&self) -> IntegrationPhase {
        self.source.phase()
    }

    /// Returns the underlying failure.
    #[must_use]
    pub const fn failure(&self) -> &IntegrationFailure {
        &self.source
    }
}

/// Result type for coordinator operations.
pub type IntegrationResult = Result<(), IntegrationError>;

/// Turns card lifecycle transitions into published domain events.
///
/// Every operation asks the storage initializer to prepare status storage
/// before publishing. Without a publisher every operation is a logged no-op.
pub struct IntegrationCoordinator<R, C, S>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
    S: SyncStorageInitializer,
{
    publisher: Option<Arc<EventPublisher<R, C>>>,
    storage: Arc<S>,
    clock: Arc<C>,
    counters: IntegrationCounters,
}

impl<R, C, S> IntegrationCoordinator<R, C, S>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
    S: SyncStorageInitializer,
{
    /// Creates a coordinator without a publisher.
    #[must_use]
    pub fn new(storage: Arc<S>, clock: Arc<C>) -> Self {
        let started_at = clock.utc();
        Self {
            publisher: None,
            storage,
            clock,
            counters: IntegrationCounters::new(started_at),
        }
    }

    /// Attaches the publisher events are handed to.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<EventPublisher<R, C>>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Returns `true` when a publisher is attached.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.publisher.is_some()
    }

    /// Returns the attached publisher.
    #[must_use]
    pub const fn publisher(&self) -> Option<&Arc<EventPublisher<R, C>>> {
        self.publisher.as_ref()
    }

    /// Takes a snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> IntegrationStats {
        self.counters.snapshot(self.clock.utc())
    }

    /// Reports that `card` was put on the schedule.
    ///
    /// A card without a scheduled date is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError`] when storage preparation or publication
    /// fails.
    pub async fn on_scheduled(
        &self,
        card: CardSnapshot,
        previous_scheduled_date: Option<NaiveDateTime>,
    ) -> IntegrationResult {
        if !card.is_scheduled() {
            warn!(card_id = %card.id(), "scheduling reported for a card without a scheduled date");
            return Ok(());
        }
        let event = DomainEvent::scheduled(card, previous_scheduled_date, &*self.clock);
        self.integrate(event, &[EventKind::Scheduled]).await
    }

    /// Reports that `card` was taken off the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError`] when storage preparation or publication
    /// fails.
    pub async fn on_unscheduled(
        &self,
        card: CardSnapshot,
        previous_scheduled_date: Option<NaiveDateTime>,
    ) -> IntegrationResult {
        let event = DomainEvent::unscheduled(card, previous_scheduled_date, &*self.clock);
        self.integrate(event, &[EventKind::Unscheduled]).await
    }

    /// Reports an edit of `card`; `previous` is the state before the edit.
    ///
    /// Without a previous snapshot every tracked field counts as changed.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError`] when storage preparation or publication
    /// fails.
    pub async fn on_updated(
        &self,
        card: CardSnapshot,
        previous: Option<CardSnapshot>,
    ) -> IntegrationResult {
        let event = DomainEvent::updated(card, previous, &*self.clock);
        self.integrate(event, &[EventKind::Updated]).await
    }

    /// Reports that `card` moved between columns.
    ///
    /// Counted as both an update and a move.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError`] when storage preparation or publication
    /// fails.
    pub async fn on_moved(
        &self,
        card: CardSnapshot,
        from_column: ColumnId,
        to_column: ColumnId,
    ) -> IntegrationResult {
        let event = DomainEvent::moved(card, from_column, to_column, &*self.clock);
        self.integrate(event, &[EventKind::Updated, EventKind::Moved])
            .await
    }

    /// Reports that the card was deleted.
    ///
    /// Counted as both an unscheduling and a deletion.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError`] when storage preparation or publication
    /// fails.
    pub async fn on_deleted(&self, entity_id: CardId) -> IntegrationResult {
        let event = DomainEvent::deleted(entity_id, &*self.clock);
        self.integrate(event, &[EventKind::Unscheduled, EventKind::Deleted])
            .await
    }

    async fn integrate(&self, event: DomainEvent, tallies: &[EventKind]) -> IntegrationResult {
        let Some(publisher) = self.publisher.as_ref() else {
            warn!(
                card_id = %event.entity_id(),
                kind = %event.kind(),
                "no event publisher configured; skipping integration"
            );
            return Ok(());
        };

        let outcome: Result<DispatchReport, IntegrationFailure> = async {
            self.storage.ensure_sync_status_storage().await?;
            Ok(publisher.publish(&event).await?)
        }
        .await;

        match outcome {
            Ok(report) => {
                self.counters.record_success(tallies, self.clock.utc());
                info!(
                    card_id = %event.entity_id(),
                    kind = %event.kind(),
                    delivered = report.delivered().len(),
                    "card integrated"
                );
                Ok(())
            }
            Err(failure) => {
                self.counters.record_failure();
                error!(
                    card_id = %event.entity_id(),
                    kind = %event.kind(),
                    phase = %failure.phase(),
                    error = %failure,
                    "integration failed"
                );
                Err(IntegrationError {
                    entity_id: event.entity_id(),
                    kind: event.kind(),
                    source: failure,
                })
            }
        }
    }
}
