//! Service layer for synchronization status tracking.

mod tracking;

pub use tracking::{SyncStatusService, SyncStatusServiceError, SyncStatusServiceResult};
