//! Card lifecycle events and their fan-out to synchronizers.
//!
//! [`domain::DomainEvent`] values are immutable records of a scheduling
//! transition. [`services::EventPublisher`] delivers each event, in
//! priority order, to every subscribed synchronizer able to handle it and
//! isolates their failures from one another.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
