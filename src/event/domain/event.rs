//! Immutable card lifecycle event.

use super::{ChangedFields, EventKind, TrackedField};
use crate::card::{CardId, CardSnapshot, ColumnId};
use chrono::{DateTime, NaiveDateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Payload of a card lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardEvent {
    /// The card received a scheduled date.
    Scheduled {
        /// Card state after the transition.
        card: CardSnapshot,
        /// Scheduled date before the transition, if any.
        previous_scheduled_date: Option<NaiveDateTime>,
    },
    /// The card lost its scheduled date.
    Unscheduled {
        /// Card state after the transition.
        card: CardSnapshot,
        /// Scheduled date the card had before, if known.
        previous_scheduled_date: Option<NaiveDateTime>,
    },
    /// Card fields changed.
    Updated {
        /// Card state after the change.
        card: CardSnapshot,
        /// Card state before the change, if known.
        previous: Option<CardSnapshot>,
        /// Fields that differ between the two states.
        changed_fields: ChangedFields,
    },
    /// The card moved between columns.
    Moved {
        /// Card state after the move.
        card: CardSnapshot,
        /// Source column.
        from_column: ColumnId,
        /// Destination column.
        to_column: ColumnId,
        /// Fields reported as changed; a move carries no previous state.
        changed_fields: ChangedFields,
    },
    /// The card was deleted.
    Deleted {
        /// Identity-only snapshot of the deleted card.
        card: CardSnapshot,
    },
}

/// Card lifecycle event with the time it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    payload: CardEvent,
    occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    /// Creates an event from a payload.
    #[must_use]
    pub fn new(payload: CardEvent, clock: &impl Clock) -> Self {
        Self {
            payload,
            occurred_at: clock.utc(),
        }
    }

    /// Creates a scheduling event.
    #[must_use]
    pub fn scheduled(
        card: CardSnapshot,
        previous_scheduled_date: Option<NaiveDateTime>,
        clock: &impl Clock,
    ) -> Self {
        Self::new(
            CardEvent::Scheduled {
                card,
                previous_scheduled_date,
            },
            clock,
        )
    }

    /// Creates an unscheduling event.
    #[must_use]
    pub fn unscheduled(
        card: CardSnapshot,
        previous_scheduled_date: Option<NaiveDateTime>,
        clock: &impl Clock,
    ) -> Self {
        Self::new(
            CardEvent::Unscheduled {
                card,
                previous_scheduled_date,
            },
            clock,
        )
    }

    /// Creates an update event, diffing against `previous`.
    #[must_use]
    pub fn updated(card: CardSnapshot, previous: Option<CardSnapshot>, clock: &impl Clock) -> Self {
        let changed_fields = ChangedFields::between(&card, previous.as_ref());
        Self::new(
            CardEvent::Updated {
                card,
                previous,
                changed_fields,
            },
            clock,
        )
    }

    /// Creates a move event; every tracked field counts as changed.
    #[must_use]
    pub fn moved(
        card: CardSnapshot,
        from_column: ColumnId,
        to_column: ColumnId,
        clock: &impl Clock,
    ) -> Self {
        Self::new(
            CardEvent::Moved {
                card,
                from_column,
                to_column,
                changed_fields: ChangedFields::all(),
            },
            clock,
        )
    }

    /// Creates a deletion event for a card that no longer exists.
    #[must_use]
    pub fn deleted(entity_id: CardId, clock: &impl Clock) -> Self {
        Self::new(
            CardEvent::Deleted {
                card: CardSnapshot::shell(entity_id),
            },
            clock,
        )
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &CardEvent {
        &self.payload
    }

    /// Returns when the transition happened.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Returns the event kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self.payload {
            CardEvent::Scheduled { .. } => EventKind::Scheduled,
            CardEvent::Unscheduled { .. } => EventKind::Unscheduled,
            CardEvent::Updated { .. } => EventKind::Updated,
            CardEvent::Moved { .. } => EventKind::Moved,
            CardEvent::Deleted { .. } => EventKind::Deleted,
        }
    }

    /// Returns the card state carried by the event.
    #[must_use]
    pub const fn card(&self) -> &CardSnapshot {
        match &self.payload {
            CardEvent::Scheduled { card, .. }
            | CardEvent::Unscheduled { card, .. }
            | CardEvent::Updated { card, .. }
            | CardEvent::Moved { card, .. }
            | CardEvent::Deleted { card } => card,
        }
    }

    /// Returns the card identifier.
    #[must_use]
    pub const fn entity_id(&self) -> CardId {
        self.card().id()
    }

    /// Returns the changed-field set of update and move events.
    #[must_use]
    pub const fn changed_fields(&self) -> Option<&ChangedFields> {
        match &self.payload {
            CardEvent::Updated { changed_fields, .. } | CardEvent::Moved { changed_fields, .. } => {
                Some(changed_fields)
            }
            CardEvent::Scheduled { .. } | CardEvent::Unscheduled { .. } | CardEvent::Deleted { .. } => {
                None
            }
        }
    }

    /// Returns the scheduled date the card had before this transition.
    #[must_use]
    pub fn previous_scheduled_date(&self) -> Option<NaiveDateTime> {
        match &self.payload {
            CardEvent::Scheduled {
                previous_scheduled_date,
                ..
            }
            | CardEvent::Unscheduled {
                previous_scheduled_date,
                ..
            } => *previous_scheduled_date,
            CardEvent::Updated { previous, .. } => {
                previous.as_ref().and_then(CardSnapshot::scheduled_date)
            }
            CardEvent::Moved { .. } | CardEvent::Deleted { .. } => None,
        }
    }

    /// Returns `true` for a scheduling event on a card never scheduled
    /// before.
    #[must_use]
    pub const fn is_first_scheduling(&self) -> bool {
        matches!(
            self.payload,
            CardEvent::Scheduled {
                previous_scheduled_date: None,
                ..
            }
        )
    }

    /// Returns `true` when `field` is reported as changed.
    #[must_use]
    pub fn is_field_changed(&self, field: TrackedField) -> bool {
        self.changed_fields()
            .is_some_and(|fields| fields.contains(field))
    }

    /// Returns `true` when external systems need to hear about the event.
    ///
    /// Scheduling, unscheduling and deletion always do; updates and moves
    /// only when a mirrored field changed.
    #[must_use]
    pub fn requires_external_sync(&self) -> bool {
        self.changed_fields()
            .is_none_or(ChangedFields::requires_external_sync)
    }
}
