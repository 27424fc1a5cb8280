//! `PostgreSQL` adapters for synchronization status persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresSyncStatusRepository, SyncStatusPgPool};
