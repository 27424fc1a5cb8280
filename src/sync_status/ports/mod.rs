//! Port contracts for synchronization status persistence.

mod repository;

pub use repository::{
    SyncStatusRepository, SyncStatusRepositoryError, SyncStatusRepositoryResult,
    SyncStorageInitializer,
};
