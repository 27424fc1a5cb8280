//! Domain model for synchronization status rows.

mod error;
mod ids;
mod integration_type;
mod record;
mod statistics;
mod status;

pub use error::{ParseIntegrationTypeError, ParseSyncStatusError};
pub use ids::SyncStatusId;
pub use integration_type::IntegrationType;
pub use record::{DEFAULT_MAX_RETRIES, IntegrationSyncStatus, PersistedSyncStatusData};
pub use statistics::SyncStatistics;
pub use status::SyncStatus;
