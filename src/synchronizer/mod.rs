//! Per-integration synchronizers that mirror cards into external systems.
//!
//! A synchronizer reacts to [`crate::event::domain::DomainEvent`] values,
//! converts the card into the external representation (a calendar event
//! or a remote task), calls the external service under a retry policy and
//! records the outcome in the synchronization status store. Handling is
//! idempotent: replaying an event converges to the same external state.
//!
//! - Presentation rules and external DTOs in [`domain`]
//! - External service contracts in [`ports`]
//! - In-memory service doubles in [`adapters`]
//! - Calendar and task list synchronizers in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
