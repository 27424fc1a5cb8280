//! Error types for card snapshot validation and parsing.

use thiserror::Error;

/// Errors returned while constructing card snapshot values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CardDomainError {
    /// The identifier is not a positive integer.
    #[error("invalid {kind} identifier {value}, expected a positive integer")]
    InvalidIdentifier {
        /// Identifier kind (card, column, card type).
        kind: &'static str,
        /// Rejected raw value.
        value: i64,
    },

    /// The urgency level is outside the supported range.
    #[error("invalid urgency level {0}, expected 0 to 4")]
    InvalidUrgency(u8),
}

/// Error returned while parsing progress types from external values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown progress type: {0}")]
pub struct ParseProgressTypeError(pub String);
