//! Entry point for card lifecycle notifications.
//!
//! [`services::IntegrationCoordinator`] turns scheduling transitions into
//! [`crate::event::domain::DomainEvent`] values, checks that status storage
//! is ready, publishes the event and keeps process-wide counters that can
//! be read as an [`domain::IntegrationStats`] snapshot.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
