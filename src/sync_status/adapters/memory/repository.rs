//! Thread-safe in-memory synchronization status repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::card::CardId;
use crate::sync_status::{
    domain::{IntegrationSyncStatus, IntegrationType, SyncStatus, SyncStatusId},
    ports::{
        SyncStatusRepository, SyncStatusRepositoryError, SyncStatusRepositoryResult,
        SyncStorageInitializer,
    },
};

type StatusKey = (CardId, IntegrationType);

/// In-memory synchronization status repository for tests and embedding.
///
/// Also acts as its own [`SyncStorageInitializer`], counting how often
/// storage preparation was requested.
#[derive(Debug, Clone, Default)]
pub struct InMemorySyncStatusRepository {
    state: Arc<RwLock<InMemorySyncStatusState>>,
}

#[derive(Debug, Default)]
struct InMemorySyncStatusState {
    rows: BTreeMap<SyncStatusId, IntegrationSyncStatus>,
    key_index: HashMap<StatusKey, SyncStatusId>,
    last_id: i64,
    storage_checks: u64,
    storage_unavailable: bool,
}

impl InMemorySyncStatusRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many times storage preparation was requested.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusRepositoryError::Persistence`] when the state
    /// lock is poisoned.
    pub fn storage_check_count(&self) -> SyncStatusRepositoryResult<u64> {
        Ok(self.read()?.storage_checks)
    }

    /// Makes storage preparation fail until re-enabled.
    ///
    /// # Errors
    ///
    /// Returns [`SyncStatusRepositoryError::Persistence`] when the state
    /// lock is poisoned.
    pub fn set_storage_available(&self, available: bool) -> SyncStatusRepositoryResult<()> {
        self.write()?.storage_unavailable = !available;
        Ok(())
    }

    fn read(
        &self,
    ) -> SyncStatusRepositoryResult<std::sync::RwLockReadGuard<'_, InMemorySyncStatusState>> {
        self.state.read().map_err(|err| {
            SyncStatusRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
    ) -> SyncStatusRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemorySyncStatusState>> {
        self.state.write().map_err(|err| {
            SyncStatusRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn collect_sorted<F, K>(
        &self,
        filter: F,
        sort_key: K,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>>
    where
        F: Fn(&IntegrationSyncStatus) -> bool,
        K: FnMut(&IntegrationSyncStatus) -> (DateTime<Utc>, Option<SyncStatusId>),
    {
        let state = self.read()?;
        let mut rows: Vec<IntegrationSyncStatus> = state
            .rows
            .values()
            .filter(|row| filter(row))
            .cloned()
            .collect();
        rows.sort_by_key(sort_key);
        Ok(rows)
    }
}

#[async_trait]
impl SyncStatusRepository for InMemorySyncStatusRepository {
    async fn insert(
        &self,
        status: &IntegrationSyncStatus,
    ) -> SyncStatusRepositoryResult<IntegrationSyncStatus> {
        let mut state = self.write()?;
        let key = (status.entity_id(), status.integration_type());
        if state.key_index.contains_key(&key) {
            return Err(SyncStatusRepositoryError::Duplicate {
                entity_id: key.0,
                integration_type: key.1,
            });
        }

        state.last_id = state.last_id.saturating_add(1);
        let id = SyncStatusId::new(state.last_id);
        let stored = status.clone().with_id(id);
        state.key_index.insert(key, id);
        state.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, status: &IntegrationSyncStatus) -> SyncStatusRepositoryResult<()> {
        let id = status
            .id()
            .ok_or(SyncStatusRepositoryError::Unpersisted(status.entity_id()))?;
        let mut state = self.write()?;
        let slot = state
            .rows
            .get_mut(&id)
            .ok_or(SyncStatusRepositoryError::NotFound(id))?;
        *slot = status.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: SyncStatusId,
    ) -> SyncStatusRepositoryResult<Option<IntegrationSyncStatus>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn find_by_entity_and_type(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusRepositoryResult<Option<IntegrationSyncStatus>> {
        let state = self.read()?;
        let row = state
            .key_index
            .get(&(entity_id, integration_type))
            .and_then(|id| state.rows.get(id))
            .cloned();
        Ok(row)
    }

    async fn find_by_entity(
        &self,
        entity_id: CardId,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>> {
        let state = self.read()?;
        let mut rows: Vec<IntegrationSyncStatus> = state
            .rows
            .values()
            .filter(|row| row.entity_id() == entity_id)
            .cloned()
            .collect();
        rows.sort_by_key(IntegrationSyncStatus::integration_type);
        Ok(rows)
    }

    async fn find_by_integration_type(
        &self,
        integration_type: IntegrationType,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>> {
        let mut rows = self.collect_sorted(
            |row| row.integration_type() == integration_type,
            |row| (row.created_at(), row.id()),
        )?;
        rows.reverse();
        Ok(rows)
    }

    async fn find_by_status(
        &self,
        status: SyncStatus,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>> {
        let mut rows = self.collect_sorted(
            |row| row.status() == status,
            |row| (row.updated_at(), row.id()),
        )?;
        rows.reverse();
        Ok(rows)
    }

    async fn find_retry_candidates(&self) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>> {
        self.collect_sorted(
            |row| row.status().is_in_progress() && row.can_retry(),
            |row| (row.updated_at(), row.id()),
        )
    }

    async fn find_error_retry_candidates(
        &self,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>> {
        self.collect_sorted(
            |row| row.status() == SyncStatus::Error && row.can_retry(),
            |row| (row.updated_at(), row.id()),
        )
    }

    async fn delete_by_entity(&self, entity_id: CardId) -> SyncStatusRepositoryResult<u64> {
        let mut state = self.write()?;
        let mut removed = 0_u64;
        for integration_type in IntegrationType::ALL {
            if let Some(id) = state.key_index.remove(&(entity_id, integration_type)) {
                state.rows.remove(&id);
                removed = removed.saturating_add(1);
            }
        }
        Ok(removed)
    }

    async fn delete_by_entity_and_type(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusRepositoryResult<bool> {
        let mut state = self.write()?;
        let Some(id) = state.key_index.remove(&(entity_id, integration_type)) else {
            return Ok(false);
        };
        state.rows.remove(&id);
        Ok(true)
    }

    async fn count_by_status(&self, status: SyncStatus) -> SyncStatusRepositoryResult<u64> {
        let state = self.read()?;
        let count = state.rows.values().filter(|row| row.status() == status).count();
        u64::try_from(count).map_err(SyncStatusRepositoryError::persistence)
    }

    async fn count_by_integration_type(
        &self,
        integration_type: IntegrationType,
    ) -> SyncStatusRepositoryResult<u64> {
        let state = self.read()?;
        let count = state
            .rows
            .values()
            .filter(|row| row.integration_type() == integration_type)
            .count();
        u64::try_from(count).map_err(SyncStatusRepositoryError::persistence)
    }
}

#[async_trait]
impl SyncStorageInitializer for InMemorySyncStatusRepository {
    async fn ensure_sync_status_storage(&self) -> SyncStatusRepositoryResult<()> {
        let mut state = self.write()?;
        state.storage_checks = state.storage_checks.saturating_add(1);
        if state.storage_unavailable {
            return Err(SyncStatusRepositoryError::persistence(
                std::io::Error::other("sync status storage unavailable"),
            ));
        }
        Ok(())
    }
}
