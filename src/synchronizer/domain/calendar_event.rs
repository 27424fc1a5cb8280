//! Calendar event derived from a scheduled card.

use super::{EventPriority, urgency_color};
use crate::card::{CardId, CardSnapshot};
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(time) => time,
    None => NaiveTime::MIN,
};
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Calendar event linked to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    id: Option<String>,
    title: String,
    description: Option<String>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    all_day: bool,
    priority: EventPriority,
    color: String,
    related_entity_id: CardId,
}

impl CalendarEvent {
    /// Builds the event for a scheduled card.
    ///
    /// Returns `None` when the card has no scheduled date. A start at
    /// exactly midnight makes an all-day event. The end is the due date
    /// when present, otherwise the end of the day for all-day events or
    /// one hour after the start.
    #[must_use]
    pub fn for_card(card: &CardSnapshot) -> Option<Self> {
        let start = card.scheduled_date()?;
        let all_day = start.time() == NaiveTime::MIN;
        let end = card.due_date().unwrap_or_else(|| {
            if all_day {
                start.date().and_time(END_OF_DAY)
            } else {
                start
                    .checked_add_signed(TimeDelta::hours(1))
                    .unwrap_or(start)
            }
        });

        Some(Self {
            id: None,
            title: card.title().to_owned(),
            description: describe(card),
            start,
            end,
            all_day,
            priority: EventPriority::for_urgency(card.urgency()),
            color: urgency_color(card.urgency()).to_owned(),
            related_entity_id: card.id(),
        })
    }

    /// Returns the event carrying a service-assigned identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns the service-assigned identifier, absent before creation.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the start time.
    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Returns the end time.
    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Returns `true` for all-day events.
    #[must_use]
    pub const fn is_all_day(&self) -> bool {
        self.all_day
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> EventPriority {
        self.priority
    }

    /// Returns the hex colour.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns the linked card.
    #[must_use]
    pub const fn related_entity_id(&self) -> CardId {
        self.related_entity_id
    }
}

fn describe(card: &CardSnapshot) -> Option<String> {
    let due = card
        .due_date()
        .map(|due| format!("Due: {}", due.format(DATE_FORMAT)));
    match (card.description().filter(|text| !text.is_empty()), due) {
        (Some(text), Some(due_line)) => Some(format!("{text}\n\n{due_line}")),
        (Some(text), None) => Some(text.to_owned()),
        (None, due_line) => due_line,
    }
}
