//! End-to-end card lifecycle through the engine.

use super::helpers::{EngineHarness, at, card_id, harness, scheduled_card};
use card_sync::{
    card::{CardSnapshot, ColumnId},
    sync_status::domain::{IntegrationType, SyncStatus},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn card_lifecycle_converges_external_state(harness: EngineHarness) {
    let coordinator = harness.engine.coordinator();
    let first = scheduled_card(1, at(20, 9)).with_board_name("Releases");

    coordinator
        .on_scheduled(first.clone(), None)
        .await
        .expect("scheduling should integrate");
    let events = harness.calendar.events().expect("readable");
    let tasks = harness.tasks.tasks().expect("readable");
    assert_eq!(events.len(), 1);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks.first().map(|task| task.list_name()), Some("Releases"));

    let rescheduled = first.clone().with_scheduled_date(at(23, 14));
    coordinator
        .on_updated(rescheduled.clone(), Some(first))
        .await
        .expect("rescheduling should integrate");
    let events = harness.calendar.events().expect("readable");
    assert_eq!(events.len(), 1);
    assert_eq!(events.first().map(|event| event.start()), Some(at(23, 14)));
    assert_eq!(harness.tasks.tasks().expect("readable").len(), 1);

    coordinator
        .on_moved(
            rescheduled.clone().with_column(ColumnId::new(2).expect("valid id")),
            ColumnId::new(1).expect("valid id"),
            ColumnId::new(2).expect("valid id"),
        )
        .await
        .expect("move should integrate");
    assert_eq!(harness.calendar.events().expect("readable").len(), 1);
    assert_eq!(harness.tasks.tasks().expect("readable").len(), 1);

    coordinator
        .on_unscheduled(
            CardSnapshot::new(card_id(1), "Release checklist"),
            rescheduled.scheduled_date(),
        )
        .await
        .expect("unscheduling should integrate");
    assert!(harness.calendar.events().expect("readable").is_empty());
    assert!(harness.tasks.tasks().expect("readable").is_empty());
    assert!(
        harness
            .engine
            .statuses()
            .is_synced(card_id(1), IntegrationType::Calendar)
            .await
            .expect("lookup should succeed")
    );

    coordinator
        .on_deleted(card_id(1))
        .await
        .expect("deletion should integrate");
    let rows = harness
        .engine
        .statuses()
        .statuses_for_entity(card_id(1))
        .await
        .expect("lookup should succeed");
    assert!(rows.is_empty());

    let stats = coordinator.stats();
    assert_eq!(stats.successful(), 5);
    assert_eq!(stats.scheduled(), 1);
    assert_eq!(stats.updated(), 2);
    assert_eq!(stats.moved(), 1);
    assert_eq!(stats.unscheduled(), 2);
    assert_eq!(stats.deleted(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn statistics_reflect_every_integration(harness: EngineHarness) {
    let coordinator = harness.engine.coordinator();
    for id in 1..=3 {
        coordinator
            .on_scheduled(scheduled_card(id, at(21, 8)), None)
            .await
            .expect("scheduling should integrate");
    }

    let statistics = harness
        .engine
        .statistics()
        .await
        .expect("statistics should load");

    assert_eq!(statistics.total(), 6);
    assert_eq!(statistics.count(SyncStatus::Synced), 6);
    assert_eq!(statistics.count_for(IntegrationType::Calendar), 3);
    assert_eq!(statistics.count_for(IntegrationType::TaskList), 3);
    assert_eq!(statistics.success_rate().to_bits(), 100.0_f64.to_bits());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn default_task_list_comes_from_configuration(harness: EngineHarness) {
    harness
        .engine
        .coordinator()
        .on_scheduled(scheduled_card(8, at(22, 10)), None)
        .await
        .expect("scheduling should integrate");

    let tasks = harness.tasks.tasks().expect("readable");
    assert_eq!(tasks.first().map(|task| task.list_name()), Some("Team"));
    assert_eq!(
        harness
            .engine
            .statuses()
            .external_id(card_id(8), IntegrationType::TaskList)
            .await
            .expect("lookup should succeed")
            .as_deref(),
        tasks.first().and_then(|task| task.id())
    );
}
