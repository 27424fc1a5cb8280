//! Read-only card snapshot contract consumed by the synchronization engine.
//!
//! The board editor owns cards; this module only describes the immutable
//! view of a card that lifecycle events carry to synchronizers.

mod error;
mod ids;
mod progress;
mod snapshot;
mod urgency;

pub use error::{CardDomainError, ParseProgressTypeError};
pub use ids::{CardId, CardTypeId, ColumnId};
pub use progress::ProgressType;
pub use snapshot::CardSnapshot;
pub use urgency::UrgencyLevel;

#[cfg(test)]
mod tests;
