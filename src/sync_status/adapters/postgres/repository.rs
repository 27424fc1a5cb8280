//! `PostgreSQL` repository implementation for synchronization status rows.

use super::{
    models::{NewSyncStatusRow, SyncStatusRow},
    schema::integration_sync_status,
};
use crate::card::CardId;
use crate::sync_status::{
    domain::{
        IntegrationSyncStatus, IntegrationType, PersistedSyncStatusData, SyncStatus, SyncStatusId,
    },
    ports::{
        SyncStatusRepository, SyncStatusRepositoryError, SyncStatusRepositoryResult,
        SyncStorageInitializer,
    },
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// `PostgreSQL` connection pool type used by synchronization status adapters.
pub type SyncStatusPgPool = Pool<ConnectionManager<PgConnection>>;

const CREATE_STORAGE_SQL: &str = include_str!(
    "../../../../migrations/2026-10-01-000000_create_integration_sync_status/up.sql"
);

/// `PostgreSQL`-backed synchronization status repository.
#[derive(Debug, Clone)]
pub struct PostgresSyncStatusRepository {
    pool: SyncStatusPgPool,
}

impl PostgresSyncStatusRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: SyncStatusPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> SyncStatusRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> SyncStatusRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(SyncStatusRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(SyncStatusRepositoryError::persistence)?
    }

    async fn load_rows<F>(&self, query: F) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<Vec<SyncStatusRow>> + Send + 'static,
    {
        self.run_blocking(move |connection| {
            let rows = query(connection).map_err(SyncStatusRepositoryError::persistence)?;
            rows.into_iter().map(row_to_status).collect()
        })
        .await
    }
}

#[async_trait]
impl SyncStatusRepository for PostgresSyncStatusRepository {
    async fn insert(
        &self,
        status: &IntegrationSyncStatus,
    ) -> SyncStatusRepositoryResult<IntegrationSyncStatus> {
        let entity_id = status.entity_id();
        let integration_type = status.integration_type();
        let new_row = to_new_row(status)?;

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(integration_sync_status::table)
                .values(&new_row)
                .returning(SyncStatusRow::as_returning())
                .get_result::<SyncStatusRow>(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        SyncStatusRepositoryError::Duplicate {
                            entity_id,
                            integration_type,
                        }
                    }
                    _ => SyncStatusRepositoryError::persistence(err),
                })?;
            row_to_status(row)
        })
        .await
    }

    async fn update(&self, status: &IntegrationSyncStatus) -> SyncStatusRepositoryResult<()> {
        let id = status
            .id()
            .ok_or(SyncStatusRepositoryError::Unpersisted(status.entity_id()))?;
        let changes = to_new_row(status)?;

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(
                integration_sync_status::table.filter(integration_sync_status::id.eq(id.value())),
            )
            .set((
                integration_sync_status::external_id.eq(&changes.external_id),
                integration_sync_status::sync_status.eq(&changes.sync_status),
                integration_sync_status::last_sync_date.eq(changes.last_sync_date),
                integration_sync_status::error_message.eq(&changes.error_message),
                integration_sync_status::retry_count.eq(changes.retry_count),
                integration_sync_status::max_retries.eq(changes.max_retries),
                integration_sync_status::updated_at.eq(changes.updated_at),
            ))
            .execute(connection)
            .map_err(SyncStatusRepositoryError::persistence)?;

            if updated_count == 0 {
                return Err(SyncStatusRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: SyncStatusId,
    ) -> SyncStatusRepositoryResult<Option<IntegrationSyncStatus>> {
        self.run_blocking(move |connection| {
            let row = integration_sync_status::table
                .filter(integration_sync_status::id.eq(id.value()))
                .select(SyncStatusRow::as_select())
                .first::<SyncStatusRow>(connection)
                .optional()
                .map_err(SyncStatusRepositoryError::persistence)?;
            row.map(row_to_status).transpose()
        })
        .await
    }

    async fn find_by_entity_and_type(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusRepositoryResult<Option<IntegrationSyncStatus>> {
        self.run_blocking(move |connection| {
            let row = integration_sync_status::table
                .filter(integration_sync_status::entity_id.eq(entity_id.value()))
                .filter(integration_sync_status::integration_type.eq(integration_type.as_str()))
                .select(SyncStatusRow::as_select())
                .first::<SyncStatusRow>(connection)
                .optional()
                .map_err(SyncStatusRepositoryError::persistence)?;
            row.map(row_to_status).transpose()
        })
        .await
    }

    async fn find_by_entity(
        &self,
        entity_id: CardId,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>> {
        self.load_rows(move |connection| {
            integration_sync_status::table
                .filter(integration_sync_status::entity_id.eq(entity_id.value()))
                .order(integration_sync_status::integration_type.asc())
                .select(SyncStatusRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn find_by_integration_type(
        &self,
        integration_type: IntegrationType,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>> {
        self.load_rows(move |connection| {
            integration_sync_status::table
                .filter(integration_sync_status::integration_type.eq(integration_type.as_str()))
                .order((
                    integration_sync_status::created_at.desc(),
                    integration_sync_status::id.desc(),
                ))
                .select(SyncStatusRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn find_by_status(
        &self,
        status: SyncStatus,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>> {
        self.load_rows(move |connection| {
            integration_sync_status::table
                .filter(integration_sync_status::sync_status.eq(status.as_str()))
                .order((
                    integration_sync_status::updated_at.desc(),
                    integration_sync_status::id.desc(),
                ))
                .select(SyncStatusRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn find_retry_candidates(&self) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>> {
        self.load_rows(move |connection| {
            integration_sync_status::table
                .filter(integration_sync_status::sync_status.eq_any([
                    SyncStatus::Pending.as_str(),
                    SyncStatus::Retry.as_str(),
                ]))
                .filter(integration_sync_status::retry_count.lt(integration_sync_status::max_retries))
                .order((
                    integration_sync_status::updated_at.asc(),
                    integration_sync_status::id.asc(),
                ))
                .select(SyncStatusRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn find_error_retry_candidates(
        &self,
    ) -> SyncStatusRepositoryResult<Vec<IntegrationSyncStatus>> {
        self.load_rows(move |connection| {
            integration_sync_status::table
                .filter(integration_sync_status::sync_status.eq(SyncStatus::Error.as_str()))
                .filter(integration_sync_status::retry_count.lt(integration_sync_status::max_retries))
                .order((
                    integration_sync_status::updated_at.asc(),
                    integration_sync_status::id.asc(),
                ))
                .select(SyncStatusRow::as_select())
                .load(connection)
        })
        .await
    }

    async fn delete_by_entity(&self, entity_id: CardId) -> SyncStatusRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                integration_sync_status::table
                    .filter(integration_sync_status::entity_id.eq(entity_id.value())),
            )
            .execute(connection)
            .map_err(SyncStatusRepositoryError::persistence)?;
            u64::try_from(removed).map_err(SyncStatusRepositoryError::persistence)
        })
        .await
    }

    async fn delete_by_entity_and_type(
        &self,
        entity_id: CardId,
        integration_type: IntegrationType,
    ) -> SyncStatusRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                integration_sync_status::table
                    .filter(integration_sync_status::entity_id.eq(entity_id.value()))
                    .filter(
                        integration_sync_status::integration_type.eq(integration_type.as_str()),
                    ),
            )
            .execute(connection)
            .map_err(SyncStatusRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }

    async fn count_by_status(&self, status: SyncStatus) -> SyncStatusRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count = integration_sync_status::table
                .filter(integration_sync_status::sync_status.eq(status.as_str()))
                .count()
                .get_result::<i64>(connection)
                .map_err(SyncStatusRepositoryError::persistence)?;
            u64::try_from(count).map_err(SyncStatusRepositoryError::invalid_persisted_data)
        })
        .await
    }

    async fn count_by_integration_type(
        &self,
        integration_type: IntegrationType,
    ) -> SyncStatusRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count = integration_sync_status::table
                .filter(integration_sync_status::integration_type.eq(integration_type.as_str()))
                .count()
                .get_result::<i64>(connection)
                .map_err(SyncStatusRepositoryError::persistence)?;
            u64::try_from(count).map_err(SyncStatusRepositoryError::invalid_persisted_data)
        })
        .await
    }
}

#[async_trait]
impl SyncStorageInitializer for PostgresSyncStatusRepository {
    async fn ensure_sync_status_storage(&self) -> SyncStatusRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(CREATE_STORAGE_SQL)
                .map_err(SyncStatusRepositoryError::persistence)?;
            debug!("integration_sync_status storage ensured");
            Ok(())
        })
        .await
    }
}

fn to_new_row(status: &IntegrationSyncStatus) -> SyncStatusRepositoryResult<NewSyncStatusRow> {
    let retry_count =
        i32::try_from(status.retry_count()).map_err(SyncStatusRepositoryError::persistence)?;
    let max_retries =
        i32::try_from(status.max_retries()).map_err(SyncStatusRepositoryError::persistence)?;

    Ok(NewSyncStatusRow {
        entity_id: status.entity_id().value(),
        integration_type: status.integration_type().as_str().to_owned(),
        external_id: status.external_id().map(str::to_owned),
        sync_status: status.status().as_str().to_owned(),
        last_sync_date: status.last_sync_at(),
        error_message: status.error_message().map(str::to_owned),
        retry_count,
        max_retries,
        created_at: status.created_at(),
        updated_at: status.updated_at(),
    })
}

fn row_to_status(row: SyncStatusRow) -> SyncStatusRepositoryResult<IntegrationSyncStatus> {
    let SyncStatusRow {
        id,
        entity_id,
        integration_type,
        external_id,
        sync_status,
        last_sync_date,
        error_message,
        retry_count,
        max_retries,
        created_at,
        updated_at,
    } = row;

    let data = PersistedSyncStatusData {
        id: SyncStatusId::new(id),
        entity_id: CardId::new(entity_id)
            .map_err(SyncStatusRepositoryError::invalid_persisted_data)?,
        integration_type: IntegrationType::try_from(integration_type.as_str())
            .map_err(SyncStatusRepositoryError::invalid_persisted_data)?,
        external_id,
        status: SyncStatus::try_from(sync_status.as_str())
            .map_err(SyncStatusRepositoryError::invalid_persisted_data)?,
        last_sync_at: last_sync_date,
        error_message,
        retry_count: u32::try_from(retry_count)
            .map_err(SyncStatusRepositoryError::invalid_persisted_data)?,
        max_retries: u32::try_from(max_retries)
            .map_err(SyncStatusRepositoryError::invalid_persisted_data)?,
        created_at,
        updated_at,
    };
    Ok(IntegrationSyncStatus::from_persisted(data))
}

#[cfg(test)]
mod tests {
    use super::{row_to_status, to_new_row};
    use crate::card::CardId;
    use crate::sync_status::{
        adapters::postgres::models::SyncStatusRow,
        domain::{IntegrationSyncStatus, IntegrationType, SyncStatus, SyncStatusId},
        ports::SyncStatusRepositoryError,
    };
    use chrono::Utc;
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};

    #[fixture]
    fn row() -> SyncStatusRow {
        let now = Utc::now();
        SyncStatusRow {
            id: 7,
            entity_id: 42,
            integration_type: "CALENDAR".to_owned(),
            external_id: Some("evt-1".to_owned()),
            sync_status: "RETRY".to_owned(),
            last_sync_date: None,
            error_message: Some("timeout".to_owned()),
            retry_count: 1,
            max_retries: 3,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn row_converts_to_domain(row: SyncStatusRow) {
        let status = row_to_status(row).expect("row should convert");

        assert_eq!(status.id().map(SyncStatusId::value), Some(7));
        assert_eq!(status.integration_type(), IntegrationType::Calendar);
        assert_eq!(status.status(), SyncStatus::Retry);
        assert_eq!(status.retry_count(), 1);
        assert_eq!(status.external_id(), Some("evt-1"));
    }

    #[rstest]
    #[case::unknown_status(|row: &mut SyncStatusRow| row.sync_status = "DONE".to_owned())]
    #[case::unknown_type(|row: &mut SyncStatusRow| row.integration_type = "FAX".to_owned())]
    #[case::negative_retries(|row: &mut SyncStatusRow| row.retry_count = -1)]
    #[case::zero_entity(|row: &mut SyncStatusRow| row.entity_id = 0)]
    fn corrupt_rows_are_rejected(mut row: SyncStatusRow, #[case] corrupt: fn(&mut SyncStatusRow)) {
        corrupt(&mut row);

        assert!(matches!(
            row_to_status(row),
            Err(SyncStatusRepositoryError::InvalidPersistedData(_))
        ));
    }

    #[rstest]
    fn new_row_uses_storage_names() {
        let entity = CardId::new(5).expect("valid card id");
        let status =
            IntegrationSyncStatus::pending(entity, IntegrationType::TaskList, 3, &DefaultClock);

        let new_row = to_new_row(&status).expect("row should build");

        assert_eq!(new_row.integration_type, "TASK_LIST");
        assert_eq!(new_row.sync_status, "PENDING");
        assert_eq!(new_row.retry_count, 0);
        assert_eq!(new_row.max_retries, 3);
    }
}
