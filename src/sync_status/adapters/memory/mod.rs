//! In-memory adapters for synchronization status persistence.

mod repository;

pub use repository::InMemorySyncStatusRepository;
