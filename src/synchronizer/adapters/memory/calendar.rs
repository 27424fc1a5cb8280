//! In-memory calendar service.

use super::{ScriptedFailures, lock_error};
use crate::card::CardId;
use crate::retry::domain::FailureKind;
use crate::synchronizer::{
    domain::CalendarEvent,
    ports::{CalendarService, ExternalServiceError, ExternalServiceResult},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

/// Thread-safe in-memory calendar.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCalendarService {
    state: Arc<RwLock<CalendarState>>,
}

#[derive(Debug, Default)]
struct CalendarState {
    events: BTreeMap<String, CalendarEvent>,
    last_id: u64,
    failures: ScriptedFailures,
}

impl InMemoryCalendarService {
    /// Creates an empty calendar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call fail with `err`; repeated calls queue up.
    ///
    /// # Errors
    ///
    /// Returns an I/O-classified error when the state lock is poisoned.
    pub fn fail_next(&self, err: ExternalServiceError) -> ExternalServiceResult<()> {
        self.write()?.failures.push(err);
        Ok(())
    }

    /// Returns a copy of every stored event.
    ///
    /// # Errors
    ///
    /// Returns an I/O-classified error when the state lock is poisoned.
    pub fn events(&self) -> ExternalServiceResult<Vec<CalendarEvent>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.events.values().cloned().collect())
    }

    /// Returns how many port calls were made, failed ones included.
    ///
    /// # Errors
    ///
    /// Returns an I/O-classified error when the state lock is poisoned.
    pub fn call_count(&self) -> ExternalServiceResult<u64> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.failures.calls)
    }

    fn write(&self) -> ExternalServiceResult<RwLockWriteGuard<'_, CalendarState>> {
        self.state.write().map_err(|err| lock_error(&err))
    }
}

#[async_trait]
impl CalendarService for InMemoryCalendarService {
    async fn create_event(&self, event: &CalendarEvent) -> ExternalServiceResult<CalendarEvent> {
        let mut state = self.write()?;
        state.failures.begin_call()?;
        state.last_id = state.last_id.saturating_add(1);
        let id = format!("evt-{}", state.last_id);
        let created = event.clone().with_id(id.clone());
        state.events.insert(id, created.clone());
        Ok(created)
    }

    async fn update_event(&self, event: &CalendarEvent) -> ExternalServiceResult<()> {
        let mut state = self.write()?;
        state.failures.begin_call()?;
        let id = event.id().ok_or_else(|| {
            ExternalServiceError::new(
                FailureKind::InvalidArgument,
                "cannot update an event without an identifier",
            )
        })?;
        let slot = state.events.get_mut(id).ok_or_else(|| {
            ExternalServiceError::new(
                FailureKind::InvalidArgument,
                format!("calendar event {id} does not exist"),
            )
        })?;
        *slot = event.clone();
        Ok(())
    }

    async fn events_for_date(&self, date: NaiveDate) -> ExternalServiceResult<Vec<CalendarEvent>> {
        let mut state = self.write()?;
        state.failures.begin_call()?;
        Ok(state
            .events
            .values()
            .filter(|event| event.start().date() == date)
            .cloned()
            .collect())
    }

    async fn events_for_entity(
        &self,
        entity_id: CardId,
    ) -> ExternalServiceResult<Vec<CalendarEvent>> {
        let mut state = self.write()?;
        state.failures.begin_call()?;
        Ok(state
            .events
            .values()
            .filter(|event| event.related_entity_id() == entity_id)
            .cloned()
            .collect())
    }

    async fn delete_event(&self, event_id: &str) -> ExternalServiceResult<bool> {
        let mut state = self.write()?;
        state.failures.begin_call()?;
        Ok(state.events.remove(event_id).is_some())
    }
}
