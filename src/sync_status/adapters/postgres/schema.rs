//! Diesel schema for synchronization status persistence.

diesel::table! {
    /// One row per (card, integration) pair.
    integration_sync_status (id) {
        /// Storage-assigned row identifier.
        id -> Int8,
        /// Card identifier.
        entity_id -> Int8,
        /// Integration type storage name.
        #[max_length = 50]
        integration_type -> Varchar,
        /// External artifact identifier.
        #[max_length = 255]
        external_id -> Nullable<Varchar>,
        /// Synchronization status storage name.
        #[max_length = 20]
        sync_status -> Varchar,
        /// Last successful synchronization time.
        last_sync_date -> Nullable<Timestamptz>,
        /// Last recorded error.
        error_message -> Nullable<Text>,
        /// Retries spent in the current cycle.
        retry_count -> Int4,
        /// Retry budget.
        max_retries -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
