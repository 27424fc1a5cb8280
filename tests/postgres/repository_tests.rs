//! Column mapping, uniqueness and query filters of the Diesel repository.

use super::helpers::{card_id, pending, prepared_repo, test_runtime};
use card_sync::sync_status::{
    domain::{IntegrationType, SyncStatus},
    ports::{SyncStatusRepository, SyncStatusRepositoryError},
};
use chrono::SubsecRound;
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;

#[rstest]
fn stored_rows_round_trip_every_column(shared_test_cluster: &'static TestCluster) {
    let prepared = prepared_repo(shared_test_cluster, "round_trip").expect("repository setup");
    let rt = test_runtime();
    let mut status = pending(7, IntegrationType::Calendar, 3);
    status.mark_synced("evt-7", &DefaultClock);
    status.mark_error("remote said no", &DefaultClock);
    assert!(status.mark_for_retry(&DefaultClock));

    let stored = rt
        .block_on(prepared.repo.insert(&status))
        .expect("insert should succeed");
    let id = stored.id().expect("insert assigns an id");
    let loaded = rt
        .block_on(prepared.repo.find_by_id(id))
        .expect("lookup should succeed")
        .expect("row exists");

    assert_eq!(loaded, stored);
    assert_eq!(loaded.entity_id(), card_id(7));
    assert_eq!(loaded.integration_type(), IntegrationType::Calendar);
    assert_eq!(loaded.external_id(), Some("evt-7"));
    assert_eq!(loaded.status(), SyncStatus::Retry);
    assert_eq!(loaded.error_message(), Some("remote said no"));
    assert_eq!(loaded.retry_count(), 1);
    assert_eq!(loaded.max_retries(), 3);
    assert_eq!(
        loaded.last_sync_at(),
        status.last_sync_at().map(|at| at.trunc_subsecs(6))
    );
    assert_eq!(loaded.created_at(), status.created_at().trunc_subsecs(6));
    assert_eq!(loaded.updated_at(), status.updated_at().trunc_subsecs(6));
}

#[rstest]
fn second_row_for_the_same_pair_is_a_duplicate(shared_test_cluster: &'static TestCluster) {
    let prepared = prepared_repo(shared_test_cluster, "duplicate").expect("repository setup");
    let rt = test_runtime();
    rt.block_on(prepared.repo.insert(&pending(3, IntegrationType::TaskList, 3)))
        .expect("first insert should succeed");

    let err = rt
        .block_on(prepared.repo.insert(&pending(3, IntegrationType::TaskList, 5)))
        .expect_err("unique pair is enforced");

    assert!(matches!(
        err,
        SyncStatusRepositoryError::Duplicate {
            entity_id,
            integration_type: IntegrationType::TaskList,
        } if entity_id == card_id(3)
    ));
    rt.block_on(prepared.repo.insert(&pending(3, IntegrationType::Calendar, 3)))
        .expect("other integrations are independent");
}

#[rstest]
fn updates_persist_transitions_and_cleared_links(shared_test_cluster: &'static TestCluster) {
    let prepared = prepared_repo(shared_test_cluster, "update").expect("repository setup");
    let rt = test_runtime();
    let unsaved = pending(4, IntegrationType::Calendar, 3);
    let err = rt
        .block_on(prepared.repo.update(&unsaved))
        .expect_err("unsaved rows cannot be updated");
    assert!(matches!(err, SyncStatusRepositoryError::Unpersisted(_)));

    let mut stored = rt
        .block_on(prepared.repo.insert(&unsaved))
        .expect("insert should succeed");
    stored.mark_synced("evt-4", &DefaultClock);
    rt.block_on(prepared.repo.update(&stored))
        .expect("update should succeed");
    let synced = rt
        .block_on(
            prepared
                .repo
                .find_by_entity_and_type(card_id(4), IntegrationType::Calendar),
        )
        .expect("lookup should succeed")
        .expect("row exists");
    assert_eq!(synced.status(), SyncStatus::Synced);
    assert_eq!(synced.external_id(), Some("evt-4"));

    stored.mark_unlinked(&DefaultClock);
    rt.block_on(prepared.repo.update(&stored))
        .expect("update should succeed");
    let unlinked = rt
        .block_on(
            prepared
                .repo
                .find_by_entity_and_type(card_id(4), IntegrationType::Calendar),
        )
        .expect("lookup should succeed")
        .expect("row exists");
    assert_eq!(unlinked.status(), SyncStatus::Synced);
    assert_eq!(unlinked.external_id(), None);
}

#[rstest]
fn retry_queries_respect_status_and_budget(shared_test_cluster: &'static TestCluster) {
    let prepared = prepared_repo(shared_test_cluster, "retry").expect("repository setup");
    let rt = test_runtime();

    let waiting = pending(1, IntegrationType::Calendar, 3);
    let mut retrying = pending(2, IntegrationType::Calendar, 3);
    assert!(retrying.mark_for_retry(&DefaultClock));
    let mut failed = pending(3, IntegrationType::Calendar, 3);
    failed.mark_error("token revoked", &DefaultClock);
    let mut exhausted = pending(4, IntegrationType::Calendar, 1);
    assert!(exhausted.mark_for_retry(&DefaultClock));
    let mut synced = pending(5, IntegrationType::Calendar, 3);
    synced.mark_synced("evt-5", &DefaultClock);
    for row in [&waiting, &retrying, &failed, &exhausted, &synced] {
        rt.block_on(prepared.repo.insert(row))
            .expect("insert should succeed");
    }

    let candidates = rt
        .block_on(prepared.repo.find_retry_candidates())
        .expect("query should succeed");
    let candidate_ids: Vec<i64> = candidates.iter().map(|row| row.entity_id().value()).collect();
    assert_eq!(candidate_ids, vec![1, 2]);

    let recoverable = rt
        .block_on(prepared.repo.find_error_retry_candidates())
        .expect("query should succeed");
    let recoverable_ids: Vec<i64> = recoverable
        .iter()
        .map(|row| row.entity_id().value())
        .collect();
    assert_eq!(recoverable_ids, vec![3]);
    assert_eq!(exhausted.status(), SyncStatus::Error);
}

#[rstest]
fn lookups_counts_and_deletes(shared_test_cluster: &'static TestCluster) {
    let prepared = prepared_repo(shared_test_cluster, "lookups").expect("repository setup");
    let rt = test_runtime();
    for row in [
        pending(8, IntegrationType::TaskList, 3),
        pending(8, IntegrationType::Calendar, 3),
        pending(9, IntegrationType::Calendar, 3),
    ] {
        rt.block_on(prepared.repo.insert(&row))
            .expect("insert should succeed");
    }

    let for_card = rt
        .block_on(prepared.repo.find_by_entity(card_id(8)))
        .expect("query should succeed");
    let kinds: Vec<IntegrationType> = for_card.iter().map(|row| row.integration_type()).collect();
    assert_eq!(kinds, vec![IntegrationType::Calendar, IntegrationType::TaskList]);
    assert_eq!(
        rt.block_on(prepared.repo.count_by_integration_type(IntegrationType::Calendar))
            .expect("count should succeed"),
        2
    );
    assert_eq!(
        rt.block_on(prepared.repo.count_by_status(SyncStatus::Pending))
            .expect("count should succeed"),
        3
    );

    assert!(
        rt.block_on(
            prepared
                .repo
                .delete_by_entity_and_type(card_id(9), IntegrationType::Calendar)
        )
        .expect("delete should succeed")
    );
    assert!(
        !rt.block_on(
            prepared
                .repo
                .delete_by_entity_and_type(card_id(9), IntegrationType::Calendar)
        )
        .expect("delete should succeed")
    );
    assert_eq!(
        rt.block_on(prepared.repo.delete_by_entity(card_id(8)))
            .expect("delete should succeed"),
        2
    );
    assert_eq!(
        rt.block_on(prepared.repo.count_by_status(SyncStatus::Pending))
            .expect("count should succeed"),
        0
    );
}
