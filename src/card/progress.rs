//! Progress tracking mode of a card.

use super::ParseProgressTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the board editor tracks a card's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressType {
    /// No progress tracking.
    None,
    /// Manually entered percentage.
    Percentage,
    /// Derived from checklist items.
    Checklist,
    /// Custom strategy supplied by the editor.
    Custom,
}

impl ProgressType {
    /// Returns the canonical external representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Percentage => "PERCENTAGE",
            Self::Checklist => "CHECKLIST",
            Self::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for ProgressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProgressType {
    type Error = ParseProgressTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "NONE" => Ok(Self::None),
            "PERCENTAGE" => Ok(Self::Percentage),
            "CHECKLIST" => Ok(Self::Checklist),
            "CUSTOM" => Ok(Self::Custom),
            _ => Err(ParseProgressTypeError(value.to_owned())),
        }
    }
}
