//! Deadline urgency reported by the board editor.

use super::CardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Urgency level from 0 (no pressure) to 4 (overdue).
///
/// Level 3 means due today, level 2 due within a day and level 1 due within
/// two to three days.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct UrgencyLevel(u8);

impl UrgencyLevel {
    /// The card is overdue.
    pub const OVERDUE: Self = Self(4);
    /// The card is due today.
    pub const DUE_TODAY: Self = Self(3);
    /// No deadline pressure.
    pub const NONE: Self = Self(0);

    const MAX: u8 = 4;

    /// Creates a validated urgency level.
    ///
    /// # Errors
    ///
    /// Returns [`CardDomainError::InvalidUrgency`] when the level exceeds 4.
    pub const fn new(level: u8) -> Result<Self, CardDomainError> {
        if level > Self::MAX {
            return Err(CardDomainError::InvalidUrgency(level));
        }
        Ok(Self(level))
    }

    /// Returns the numeric level.
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Returns `true` for the overdue level.
    #[must_use]
    pub const fn is_overdue(self) -> bool {
        self.0 == Self::MAX
    }
}

impl TryFrom<u8> for UrgencyLevel {
    type Error = CardDomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UrgencyLevel> for u8 {
    fn from(value: UrgencyLevel) -> Self {
        value.0
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
