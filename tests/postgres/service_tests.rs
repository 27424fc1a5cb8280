//! Status tracking over a real database.

use super::helpers::{card_id, prepared_repo, test_runtime};
use card_sync::sync_status::{
    domain::{IntegrationType, SyncStatus},
    services::SyncStatusService,
};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
fn tracking_twice_reuses_the_stored_row(shared_test_cluster: &'static TestCluster) {
    let prepared = prepared_repo(shared_test_cluster, "track_twice").expect("repository setup");
    let service = SyncStatusService::new(Arc::new(prepared.repo.clone()), Arc::new(DefaultClock));
    let rt = test_runtime();

    let first = rt
        .block_on(service.create_status(card_id(5), IntegrationType::Calendar, Some(2)))
        .expect("create should succeed");
    let second = rt
        .block_on(service.create_status(card_id(5), IntegrationType::Calendar, Some(9)))
        .expect("create should succeed");

    assert_eq!(first.id(), second.id());
    assert_eq!(second.max_retries(), 2);
    let rows = rt
        .block_on(service.statuses_for_entity(card_id(5)))
        .expect("lookup should succeed");
    assert_eq!(rows.len(), 1);
}

#[rstest]
fn exhausted_budget_is_persisted_as_error(shared_test_cluster: &'static TestCluster) {
    let prepared = prepared_repo(shared_test_cluster, "budget").expect("repository setup");
    let service = SyncStatusService::new(Arc::new(prepared.repo.clone()), Arc::new(DefaultClock));
    let rt = test_runtime();
    rt.block_on(service.create_status(card_id(6), IntegrationType::TaskList, Some(2)))
        .expect("create should succeed");

    let grants: Vec<bool> = (0..3)
        .map(|_| {
            rt.block_on(service.mark_for_retry(card_id(6), IntegrationType::TaskList))
                .expect("retry bookkeeping should succeed")
        })
        .collect();

    assert_eq!(grants, vec![true, true, false]);
    let status = rt
        .block_on(service.status(card_id(6), IntegrationType::TaskList))
        .expect("lookup should succeed")
        .expect("row exists");
    assert_eq!(status.status(), SyncStatus::Error);
    assert_eq!(status.retry_count(), 2);
    let statistics = rt
        .block_on(service.statistics())
        .expect("statistics should load");
    assert_eq!(statistics.count(SyncStatus::Error), 1);
    assert_eq!(statistics.count_for(IntegrationType::TaskList), 1);
}
