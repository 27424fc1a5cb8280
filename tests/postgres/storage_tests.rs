//! Schema bootstrap through the storage initializer.

use super::helpers::{
    CleanupGuard, EMPTY_TEMPLATE_DB, card_id, pending, setup_repository, test_runtime,
};
use card_sync::sync_status::{
    domain::IntegrationType,
    ports::{SyncStatusRepository, SyncStorageInitializer},
};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;

#[rstest]
fn storage_bootstrap_creates_schema_and_can_repeat(shared_test_cluster: &'static TestCluster) {
    let db_name = format!("test_bootstrap_{}", uuid::Uuid::new_v4().simple());
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let repo = setup_repository(shared_test_cluster, &db_name, EMPTY_TEMPLATE_DB)
        .expect("repository setup");
    let rt = test_runtime();

    rt.block_on(repo.ensure_sync_status_storage())
        .expect("first bootstrap creates the table");
    rt.block_on(repo.ensure_sync_status_storage())
        .expect("second bootstrap is a no-op");

    let stored = rt
        .block_on(repo.insert(&pending(1, IntegrationType::Calendar, 3)))
        .expect("insert into bootstrapped table");
    assert_eq!(stored.entity_id(), card_id(1));
}
