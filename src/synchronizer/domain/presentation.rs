//! Urgency-driven presentation rules.

use crate::card::UrgencyLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority shown on calendar events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPriority {
    /// No deadline pressure.
    Low,
    /// Due within a few days.
    Standard,
    /// Due today or tomorrow.
    High,
    /// Overdue.
    Urgent,
}

impl EventPriority {
    /// Maps a card urgency level to an event priority.
    #[must_use]
    pub const fn for_urgency(urgency: UrgencyLevel) -> Self {
        match urgency.level() {
            4 => Self::Urgent,
            2 | 3 => Self::High,
            1 => Self::Standard,
            _ => Self::Low,
        }
    }

    /// Returns the numeric level, 1 (low) to 4 (urgent).
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Standard => 2,
            Self::High => 3,
            Self::Urgent => 4,
        }
    }

    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Standard => "STANDARD",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for EventPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the hex colour used for a card urgency level.
#[must_use]
pub const fn urgency_color(urgency: UrgencyLevel) -> &'static str {
    match urgency.level() {
        4 => "#FF0000",
        3 => "#FF6600",
        2 => "#FFAA00",
        1 => "#00AAFF",
        _ => "#00AA00",
    }
}
