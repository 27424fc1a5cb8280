//! Retry bookkeeping, manual resets and shutdown behaviour.

use super::helpers::{
    EngineHarness, at, card_id, harness, harness_with, quick_config, scheduled_card,
};
use card_sync::{
    SyncEngineConfig,
    coordinator::services::IntegrationPhase,
    retry::domain::FailureKind,
    sync_status::domain::{IntegrationType, SyncStatus},
    synchronizer::ports::ExternalServiceError,
};
use rstest::rstest;

fn timeout() -> ExternalServiceError {
    ExternalServiceError::new(FailureKind::Timeout, "upstream timed out")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exhausted_attempts_leave_a_retry_candidate(harness: EngineHarness) {
    for _ in 0..3 {
        harness.calendar.fail_next(timeout()).expect("queue failure");
    }

    let err = harness
        .engine
        .coordinator()
        .on_scheduled(scheduled_card(1, at(20, 9)), None)
        .await
        .expect_err("calendar keeps timing out");

    assert_eq!(err.phase(), IntegrationPhase::Publication);
    let candidates = harness
        .engine
        .statuses()
        .retry_candidates()
        .await
        .expect("lookup should succeed");
    assert_eq!(candidates.len(), 1);
    let candidate = candidates.first().expect("one candidate");
    assert_eq!(candidate.integration_type(), IntegrationType::Calendar);
    assert_eq!(candidate.status(), SyncStatus::Retry);
    assert_eq!(harness.tasks.tasks().expect("readable").len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replay_after_transient_outage_resynchronizes(harness: EngineHarness) {
    for _ in 0..3 {
        harness.calendar.fail_next(timeout()).expect("queue failure");
    }
    let card = scheduled_card(1, at(20, 9));
    let coordinator = harness.engine.coordinator();
    assert!(coordinator.on_scheduled(card.clone(), None).await.is_err());

    coordinator
        .on_scheduled(card, None)
        .await
        .expect("replay should integrate");

    let status = harness
        .engine
        .statuses()
        .status(card_id(1), IntegrationType::Calendar)
        .await
        .expect("lookup should succeed")
        .expect("row exists");
    assert_eq!(status.status(), SyncStatus::Synced);
    assert_eq!(status.retry_count(), 0);
    assert_eq!(status.error_message(), None);
    let stats = coordinator.stats();
    assert_eq!((stats.successful(), stats.failed()), (1, 1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exhausted_budget_is_reset_explicitly() {
    let mut config = quick_config();
    config.default_max_retries = 1;
    config.retry.max_attempts = 1;
    let harness = harness_with(config);
    let card = scheduled_card(1, at(20, 9));
    harness.calendar.fail_next(timeout()).expect("queue failure");

    assert!(
        harness
            .engine
            .coordinator()
            .on_scheduled(card, None)
            .await
            .is_err()
    );

    let statuses = harness.engine.statuses();
    let errored = statuses
        .status(card_id(1), IntegrationType::Calendar)
        .await
        .expect("lookup should succeed")
        .expect("row exists");
    assert_eq!(errored.status(), SyncStatus::Error);
    assert_eq!(errored.retry_count(), 1);
    assert!(
        statuses
            .error_retry_candidates()
            .await
            .expect("lookup should succeed")
            .is_empty()
    );

    let reset = statuses
        .reset_retries(card_id(1), IntegrationType::Calendar)
        .await
        .expect("reset should succeed")
        .expect("row exists");
    assert_eq!(reset.status(), SyncStatus::Pending);
    assert_eq!(reset.retry_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_interrupts_backoff_and_records_error() {
    let config = SyncEngineConfig::from_json(
        r#"{"retry": {"initial_delay_ms": 60000, "max_delay_ms": 60000}}"#,
    )
    .expect("configuration is valid");
    let harness = harness_with(config);
    harness
        .calendar
        .fail_next(ExternalServiceError::new(FailureKind::Connection, "refused"))
        .expect("queue failure");
    harness.engine.shutdown();

    let result = harness
        .engine
        .coordinator()
        .on_scheduled(scheduled_card(1, at(20, 9)), None)
        .await;

    assert!(result.is_err());
    assert!(harness.engine.is_shut_down());
    let status = harness
        .engine
        .statuses()
        .status(card_id(1), IntegrationType::Calendar)
        .await
        .expect("lookup should succeed")
        .expect("row exists");
    assert_eq!(status.status(), SyncStatus::Error);
    assert_eq!(status.error_message(), Some("retry cancelled during backoff"));
}
