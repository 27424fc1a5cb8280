//! Remote task derived from a scheduled card.

use crate::card::{CardId, CardSnapshot};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Task list entry linked to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTask {
    id: Option<String>,
    list_name: String,
    title: String,
    notes: String,
    due: NaiveDateTime,
    linked_entity_id: CardId,
}

impl ExternalTask {
    /// Builds the task for a scheduled card.
    ///
    /// Returns `None` when the card has no scheduled date. The task lands
    /// in the list named after the card's board, or `default_list` when the
    /// board is unknown, and is due on the card's due date, falling back to
    /// the scheduled date.
    #[must_use]
    pub fn for_card(card: &CardSnapshot, default_list: &str) -> Option<Self> {
        let scheduled = card.scheduled_date()?;
        let list_name = card
            .board_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(default_list)
            .to_owned();

        Some(Self {
            id: None,
            list_name,
            title: card.title().to_owned(),
            notes: notes(card, scheduled),
            due: card.due_date().unwrap_or(scheduled),
            linked_entity_id: card.id(),
        })
    }

    /// Returns the task carrying a service-assigned identifier.
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

    /// Returns the task list name.
    #[must_use]
    pub fn list_name(&self) -> &str {
        &self.list_name
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the notes body.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Returns the due time.
    #[must_use]
    pub const fn due(&self) -> NaiveDateTime {
        self.due
    }

    /// Returns the linked card.
    #[must_use]
    pub const fn linked_entity_id(&self) -> CardId {
        self.linked_entity_id
    }
}

fn notes(card: &CardSnapshot, scheduled: NaiveDateTime) -> String {
    let mut lines = Vec::with_capacity(4);
    if let Some(description) = card.description().filter(|text| !text.is_empty()) {
        lines.push(description.to_owned());
    }
    lines.push(format!("Scheduled: {}", scheduled.format(DATE_FORMAT)));
    if let Some(due) = card.due_date() {
        lines.push(format!("Due: {}", due.format(DATE_FORMAT)));
    }
    lines.push(format!("Card ID: {}", card.id()));
    lines.join("\n")
}
