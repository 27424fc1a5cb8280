//! Immutable card view carried by lifecycle events.

use super::{CardId, CardTypeId, ColumnId, ProgressType, UrgencyLevel};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Snapshot of the card fields the synchronization engine reads.
///
/// Dates are local wall-clock timestamps as entered on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    id: CardId,
    title: String,
    description: Option<String>,
    scheduled_date: Option<NaiveDateTime>,
    due_date: Option<NaiveDateTime>,
    urgency: UrgencyLevel,
    column_id: Option<ColumnId>,
    card_type_id: Option<CardTypeId>,
    progress_type: Option<ProgressType>,
    board_name: Option<String>,
}

impl CardSnapshot {
    /// Creates a snapshot with the mandatory identity fields.
    #[must_use]
    pub fn new(id: CardId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            scheduled_date: None,
            due_date: None,
            urgency: UrgencyLevel::NONE,
            column_id: None,
            card_type_id: None,
            progress_type: None,
            board_name: None,
        }
    }

    /// Creates an identity-only snapshot for a card that no longer exists.
    #[must_use]
    pub fn shell(id: CardId) -> Self {
        Self::new(id, String::new())
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the scheduled date.
    #[must_use]
    pub const fn with_scheduled_date(mut self, scheduled: NaiveDateTime) -> Self {
        self.scheduled_date = Some(scheduled);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due: NaiveDateTime) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Sets the urgency level.
    #[must_use]
    pub const fn with_urgency(mut self, urgency: UrgencyLevel) -> Self {
        self.urgency = urgency;
        self
    }

    /// Sets the parent column.
    #[must_use]
    pub const fn with_column(mut self, column_id: ColumnId) -> Self {
        self.column_id = Some(column_id);
        self
    }

    /// Sets the card type.
    #[must_use]
    pub const fn with_card_type(mut self, card_type_id: CardTypeId) -> Self {
        self.card_type_id = Some(card_type_id);
        self
    }

    /// Sets the progress tracking mode.
    #[must_use]
    pub const fn with_progress_type(mut self, progress_type: ProgressType) -> Self {
        self.progress_type = Some(progress_type);
        self
    }

    /// Sets the name of the board that owns the card.
    #[must_use]
    pub fn with_board_name(mut self, board_name: impl Into<String>) -> Self {
        self.board_name = Some(board_name.into());
        self
    }

    /// Returns the card identifier.
    #[must_use]
    pub const fn id(&self) -> CardId {
        self.id
    }

    /// Returns the card title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the scheduled date, if any.
    #[must_use]
    pub const fn scheduled_date(&self) -> Option<NaiveDateTime> {
        self.scheduled_date
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDateTime> {
        self.due_date
    }

    /// Returns the urgency level.
    #[must_use]
    pub const fn urgency(&self) -> UrgencyLevel {
        self.urgency
    }

    /// Returns the parent column, if known.
    #[must_use]
    pub const fn column_id(&self) -> Option<ColumnId> {
        self.column_id
    }

    /// Returns the card type, if any.
    #[must_use]
    pub const fn card_type_id(&self) -> Option<CardTypeId> {
        self.card_type_id
    }

    /// Returns the progress tracking mode, if any.
    #[must_use]
    pub const fn progress_type(&self) -> Option<ProgressType> {
        self.progress_type
    }

    /// Returns the owning board name, if known.
    #[must_use]
    pub fn board_name(&self) -> Option<&str> {
        self.board_name.as_deref()
    }

    /// Returns `true` when the card carries a scheduled date.
    #[must_use]
    pub const fn is_scheduled(&self) -> bool {
        self.scheduled_date.is_some()
    }
}
