//! Calendar service port.

use super::ExternalServiceResult;
use crate::card::CardId;
use crate::synchronizer::domain::CalendarEvent;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Calendar backend contract.
///
/// Implementations classify every failure with a
/// [`crate::retry::domain::FailureKind`].
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Creates an event and returns it with its assigned identifier.
    async fn create_event(&self, event: &CalendarEvent) -> ExternalServiceResult<CalendarEvent>;

    /// Replaces an existing event, matched by identifier.
    async fn update_event(&self, event: &CalendarEvent) -> ExternalServiceResult<()>;

    /// Returns the events starting on `date`.
    async fn events_for_date(&self, date: NaiveDate) -> ExternalServiceResult<Vec<CalendarEvent>>;

    /// Returns every event linked to a card.
    async fn events_for_entity(&self, entity_id: CardId)
    -> ExternalServiceResult<Vec<CalendarEvent>>;

    /// Deletes an event; returns `false` when it did not exist.
    async fn delete_event(&self, event_id: &str) -> ExternalServiceResult<bool>;
}
