//! Event discriminants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of card lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The card received a scheduled date.
    Scheduled,
    /// The card lost its scheduled date.
    Unscheduled,
    /// Card fields changed.
    Updated,
    /// The card moved between columns.
    Moved,
    /// The card was deleted.
    Deleted,
}

impl EventKind {
    /// Returns the canonical representation used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "card_scheduled",
            Self::Unscheduled => "card_unscheduled",
            Self::Updated => "card_updated",
            Self::Moved => "card_moved",
            Self::Deleted => "card_deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
