//! Shared helpers for `PostgreSQL` synchronization status tests.

use card_sync::card::CardId;
use card_sync::sync_status::{
    adapters::postgres::PostgresSyncStatusRepository,
    domain::{IntegrationSyncStatus, IntegrationType},
};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use tokio::runtime::Runtime;
use tracing::warn;

/// Boxed error used by setup helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Schema applied to the template database.
pub const CREATE_STORAGE_SQL: &str = include_str!(
    "../../migrations/2026-10-01-000000_create_integration_sync_status/up.sql"
);

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "card_sync_test_template";

/// Empty template shipped with every `PostgreSQL` cluster.
pub const EMPTY_TEMPLATE_DB: &str = "template0";

/// Creates a tokio runtime for async repository calls.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_STORAGE_SQL)
                .map_err(|e| eyre::eyre!("schema setup failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Creates `db_name` from `template` and returns a repository bound to it.
///
/// # Errors
///
/// Returns an error if database creation or pool construction fails.
pub fn setup_repository(
    cluster: &TestCluster,
    db_name: &str,
    template: &str,
) -> Result<PostgresSyncStatusRepository, BoxError> {
    cluster
        .create_database_from_template(db_name, template)
        .map_err(|e| Box::new(e) as BoxError)?;
    let url = cluster.connection().database_url(db_name);
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(PostgresSyncStatusRepository::new(pool))
}

/// Drops the test database when the test ends, even on panic.
pub struct CleanupGuard<'a> {
    cluster: &'a TestCluster,
    db_name: String,
}

impl<'a> CleanupGuard<'a> {
    /// Registers `db_name` for removal.
    pub const fn new(cluster: &'a TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.db_name.as_str()) {
            warn!(database = %self.db_name, error = %err, "failed to drop test database");
        }
    }
}

/// Database created from the migrated template, with its repository.
pub struct PreparedRepo<'a> {
    /// Repository bound to the temporary database.
    pub repo: PostgresSyncStatusRepository,
    _guard: CleanupGuard<'a>,
}

/// Creates a uniquely named database from the migrated template.
///
/// # Errors
///
/// Returns an error if template or database setup fails.
pub fn prepared_repo<'a>(
    cluster: &'a TestCluster,
    label: &str,
) -> Result<PreparedRepo<'a>, BoxError> {
    ensure_template(cluster)?;
    let db_name = format!("test_{label}_{}", uuid::Uuid::new_v4().simple());
    let guard = CleanupGuard::new(cluster, db_name.clone());
    let repo = setup_repository(cluster, &db_name, TEMPLATE_DB)?;
    Ok(PreparedRepo {
        repo,
        _guard: guard,
    })
}

/// Builds a card identifier for tests.
pub fn card_id(value: i64) -> CardId {
    CardId::new(value).expect("valid card id")
}

/// Builds an unsaved pending row.
pub fn pending(entity: i64, integration_type: IntegrationType, max_retries: u32) -> IntegrationSyncStatus {
    IntegrationSyncStatus::pending(card_id(entity), integration_type, max_retries, &DefaultClock)
}
