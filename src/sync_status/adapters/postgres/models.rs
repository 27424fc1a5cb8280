//! Diesel row models for synchronization status persistence.

use super::schema::integration_sync_status;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for synchronization status records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = integration_sync_status)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SyncStatusRow {
    /// Storage-assigned row identifier.
    pub id: i64,
    /// Card identifier.
    pub entity_id: i64,
    /// Integration type storage name.
    pub integration_type: String,
    /// External artifact identifier.
    pub external_id: Option<String>,
    /// Synchronization status storage name.
    pub sync_status: String,
    /// Last successful synchronization time.
    pub last_sync_date: Option<DateTime<Utc>>,
    /// Last recorded error.
    pub error_message: Option<String>,
    /// Retries spent in the current cycle.
    pub retry_count: i32,
    /// Retry budget.
    pub max_retries: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for synchronization status records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = integration_sync_status)]
pub struct NewSyncStatusRow {
    /// Card identifier.
    pub entity_id: i64,
    /// Integration type storage name.
    pub integration_type: String,
    /// External artifact identifier.
    pub external_id: Option<String>,
    /// Synchronization status storage name.
    pub sync_status: String,
    /// Last successful synchronization time.
    pub last_sync_date: Option<DateTime<Utc>>,
    /// Last recorded error.
    pub error_message: Option<String>,
    /// Retries spent in the current cycle.
    pub retry_count: i32,
    /// Retry budget.
    pub max_retries: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
