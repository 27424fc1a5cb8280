//! Calendar synchronizer.

use super::error::SynchronizerResult;
use super::runner::SyncRunner;
use crate::card::CardId;
use crate::event::domain::{DomainEvent, EventKind};
use crate::retry::domain::FailureKind;
use crate::sync_status::{domain::IntegrationType, ports::SyncStatusRepository};
use crate::synchronizer::{
    domain::CalendarEvent,
    ports::{CalendarService, ExternalServiceError, ExternalServiceResult},
};
use chrono::NaiveDateTime;
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Dispatch priority of the calendar synchronizer.
pub const CALENDAR_PRIORITY: i32 = 10;

const NAME: &str = "calendar";

/// Mirrors scheduled cards as calendar events.
///
/// Handles every event kind. A scheduled card converges to exactly one
/// linked event; a card without a schedule to none.
pub struct CalendarSynchronizer<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    calendar: Arc<dyn CalendarService>,
    runner: SyncRunner<R, C>,
    priority: i32,
}

impl<R, C> CalendarSynchronizer<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    /// Creates a calendar synchronizer with the default priority.
    #[must_use]
    pub const fn new(calendar: Arc<dyn CalendarService>, runner: SyncRunner<R, C>) -> Self {
        Self {
            calendar,
            runner,
            priority: CALENDAR_PRIORITY,
        }
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

    /// Returns the runner used for outcome recording.
    #[must_use]
    pub const fn runner(&self) -> &SyncRunner<R, C> {
        &self.runner
    }

    /// Calendar synchronization reacts to every event kind.
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

    /// Applies `event` to the calendar.
    ///
    /// # Errors
    ///
    /// Returns [`super::SynchronizerError`] when the calendar call or
    /// status bookkeeping fails.
    pub async fn handle(&self, event: &DomainEvent) -> SynchronizerResult<()> {
        let entity_id = event.entity_id();
        match event.kind() {
            EventKind::Scheduled | EventKind::Updated | EventKind::Moved
                if event.card().is_scheduled() =>
            {
                let event_id = self
                    .runner
                    .push(entity_id, IntegrationType::Calendar, "calendar.upsert_event", || {
                        self.upsert(event)
                    })
                    .await?;
                info!(card_id = %entity_id, event_id, kind = %event.kind(), "calendar event synchronized");
            }
            EventKind::Deleted => {
                self.remove_linked(entity_id).await?;
                self.runner
                    .forget(entity_id, IntegrationType::Calendar)
                    .await?;
            }
            _ => {
                self.remove_linked(entity_id).await?;
            }
        }
        Ok(())
    }

    async fn remove_linked(&self, entity_id: CardId) -> SynchronizerResult<()> {
        let removed = self
            .runner
            .cleanup(entity_id, IntegrationType::Calendar, "calendar.delete_events", || {
                self.delete_linked(entity_id)
            })
            .await?;
        debug!(card_id = %entity_id, removed, "linked calendar events removed");
        Ok(())
    }

    async fn upsert(&self, event: &DomainEvent) -> ExternalServiceResult<String> {
        let card = event.card();
        let desired = CalendarEvent::for_card(card).ok_or_else(|| {
            ExternalServiceError::new(
                FailureKind::InvalidArgument,
                format!("card {} has no scheduled date", card.id()),
            )
        })?;
        let mut linked = self
            .linked_events(card.id(), event.previous_scheduled_date())
            .await?
            .into_iter();
        let Some(existing_id) = linked.next().and_then(|existing| existing.id().map(str::to_owned))
        else {
            let created = self.calendar.create_event(&desired).await?;
            return created.id().map(str::to_owned).ok_or_else(|| {
                ExternalServiceError::new(
                    FailureKind::Unknown,
                    "calendar did not assign an event identifier",
                )
            });
        };
        self.calendar
            .update_event(&desired.with_id(existing_id.clone()))
            .await?;
        for duplicate in linked {
            if let Some(id) = duplicate.id() {
                self.calendar.delete_event(id).await?;
                debug!(card_id = %card.id(), event_id = id, "duplicate calendar event removed");
            }
        }
        Ok(existing_id)
    }

    /// Looks in the previous day first, then across the whole calendar.
    async fn linked_events(
        &self,
        entity_id: CardId,
        previous: Option<NaiveDateTime>,
    ) -> ExternalServiceResult<Vec<CalendarEvent>> {
        if let Some(previous_day) = previous.map(|moment| moment.date()) {
            let on_day: Vec<CalendarEvent> = self
                .calendar
                .events_for_date(previous_day)
                .await?
                .into_iter()
                .filter(|candidate| {
                    candidate.related_entity_id() == entity_id && candidate.id().is_some()
                })
                .collect();
            if !on_day.is_empty() {
                return Ok(on_day);
            }
        }
        Ok(self
            .calendar
            .events_for_entity(entity_id)
            .await?
            .into_iter()
            .filter(|candidate| candidate.id().is_some())
            .collect())
    }

    async fn delete_linked(&self, entity_id: CardId) -> ExternalServiceResult<u64> {
        let mut removed = 0_u64;
        for linked in self.calendar.events_for_entity(entity_id).await? {
            if let Some(id) = linked.id()
                && self.calendar.delete_event(id).await?
            {
                removed = removed.saturating_add(1);
            }
        }
        Ok(removed)
    }
}
