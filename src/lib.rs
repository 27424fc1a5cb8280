//! card-sync: keeps scheduled cards mirrored in external calendars and
//! task lists.
//!
//! Card lifecycle transitions are reported to an
//! [`coordinator::services::IntegrationCoordinator`], which turns them into
//! [`event::domain::DomainEvent`] values and publishes them. Each
//! subscribed synchronizer converts the card into its external form, calls
//! the external service under a retry policy and records the outcome in a
//! per-(card, integration) status store.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types and state machines with no infrastructure
//!   dependencies
//! - **Ports**: Trait interfaces for storage and external services
//! - **Adapters**: In-memory and `PostgreSQL` implementations of ports
//! - **Services**: Orchestration generic over ports and a clock
//!
//! # Modules
//!
//! - [`card`]: Read-only card snapshot contract
//! - [`event`]: Domain events and the event publisher
//! - [`retry`]: Retry policy, history and executor
//! - [`sync_status`]: Synchronization status state machine and storage
//! - [`synchronizer`]: Calendar and task list synchronizers
//! - [`coordinator`]: Lifecycle entry point and counters
//! - [`config`], [`engine`], [`telemetry`]: Configuration, wiring and
//!   logging setup

pub mod card;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod event;
pub mod retry;
pub mod sync_status;
pub mod synchronizer;
pub mod telemetry;

pub use config::{ConfigError, SyncEngineConfig};
pub use engine::SyncEngine;
