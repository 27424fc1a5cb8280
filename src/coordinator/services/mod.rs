//! Coordinator service.

mod coordinator;
mod counters;

pub use coordinator::{
    IntegrationCoordinator, IntegrationError, IntegrationFailure, IntegrationPhase, IntegrationResult,
};
