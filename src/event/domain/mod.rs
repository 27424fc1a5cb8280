//! Domain model for card lifecycle events.

mod event;
mod fields;
mod kind;

pub use event::{CardEvent, DomainEvent};
pub use fields::{ChangedFields, TrackedField};
pub use kind::EventKind;
