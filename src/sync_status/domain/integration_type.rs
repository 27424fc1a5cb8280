//! External systems a card can be synchronized with.

use super::ParseIntegrationTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// External integration tracked by a status row.
///
/// Variant order matches the alphabetical order of the storage names so
/// in-memory sorting agrees with `ORDER BY integration_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationType {
    /// Calendar events.
    Calendar,
    /// Remote task list entries.
    TaskList,
}

impl IntegrationType {
    /// Every supported integration.
    pub const ALL: [Self; 2] = [Self::Calendar, Self::TaskList];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "CALENDAR",
            Self::TaskList => "TASK_LIST",
        }
    }

    /// Returns a human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Calendar => "Calendar",
            Self::TaskList => "Task list",
        }
    }
}

impl fmt::Display for IntegrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IntegrationType {
    type Error = ParseIntegrationTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "CALENDAR" => Ok(Self::Calendar),
            "TASK_LIST" => Ok(Self::TaskList),
            _ => Err(ParseIntegrationTypeError(value.to_owned())),
        }
    }
}
