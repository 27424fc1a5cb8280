//! Identifier types for cards and their board placement.

use super::CardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Positive identifier of a card owned by the board editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(i64);

impl CardId {
    /// Creates a validated card identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CardDomainError::InvalidIdentifier`] when the value is not
    /// positive.
    pub const fn new(value: i64) -> Result<Self, CardDomainError> {
        if value <= 0 {
            return Err(CardDomainError::InvalidIdentifier {
                kind: "card",
                value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the board column that contains a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(i64);

impl ColumnId {
    /// Creates a validated column identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CardDomainError::InvalidIdentifier`] when the value is not
    /// positive.
    pub const fn new(value: i64) -> Result<Self, CardDomainError> {
        if value <= 0 {
            return Err(CardDomainError::InvalidIdentifier {
                kind: "column",
                value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user-defined card type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardTypeId(i64);

impl CardTypeId {
    /// Creates a validated card type identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CardDomainError::InvalidIdentifier`] when the value is not
    /// positive.
    pub const fn new(value: i64) -> Result<Self, CardDomainError> {
        if value <= 0 {
            return Err(CardDomainError::InvalidIdentifier {
                kind: "card type",
                value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CardTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
