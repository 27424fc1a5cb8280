//! Durable per-(card, integration) synchronization status tracking.
//!
//! Every external integration a card is pushed to owns one
//! [`domain::IntegrationSyncStatus`] row. Rows start `PENDING`, move to
//! `SYNCED` on success, to `RETRY` while the retry budget lasts and to
//! `ERROR` on fatal failures or budget exhaustion. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
