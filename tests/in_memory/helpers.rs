//! Shared test helpers for in-memory engine integration tests.

use card_sync::{
    SyncEngine, SyncEngineConfig,
    card::{CardId, CardSnapshot},
    sync_status::adapters::memory::InMemorySyncStatusRepository,
    synchronizer::adapters::memory::{InMemoryCalendarService, InMemoryTaskListService},
};
use chrono::{NaiveDate, NaiveDateTime};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Engine type used across integration tests.
pub type TestEngine = SyncEngine<InMemorySyncStatusRepository, DefaultClock>;

/// Engine wired to in-memory collaborators the tests can inspect.
pub struct EngineHarness {
    /// Engine under test.
    pub engine: TestEngine,
    /// Status store shared with the engine.
    pub repository: Arc<InMemorySyncStatusRepository>,
    /// Calendar the engine writes to.
    pub calendar: InMemoryCalendarService,
    /// Task list the engine writes to.
    pub tasks: InMemoryTaskListService,
}

/// Configuration with short, deterministic backoff.
#[must_use]
pub fn quick_config() -> SyncEngineConfig {
    SyncEngineConfig::from_json(
        r#"{
            "retry": {"initial_delay_ms": 1, "max_delay_ms": 5, "jitter": false},
            "default_task_list": "Team"
        }"#,
    )
    .expect("test configuration is valid")
}

/// Builds a harness around `config` with both integrations enabled.
#[must_use]
pub fn harness_with(config: SyncEngineConfig) -> EngineHarness {
    let repository = Arc::new(InMemorySyncStatusRepository::new());
    let calendar = InMemoryCalendarService::new();
    let tasks = InMemoryTaskListService::new();
    let engine = SyncEngine::new(config, Arc::clone(&repository), Arc::new(DefaultClock))
        .with_calendar(Arc::new(calendar.clone()))
        .with_task_list(Arc::new(tasks.clone()));
    EngineHarness {
        engine,
        repository,
        calendar,
        tasks,
    }
}

/// Provides a harness with quick retries.
#[fixture]
pub fn harness() -> EngineHarness {
    harness_with(quick_config())
}

/// Builds a card identifier.
#[must_use]
pub fn card_id(id: i64) -> CardId {
    CardId::new(id).expect("valid card id")
}

/// Builds an October 2026 timestamp.
#[must_use]
pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

/// Builds a card scheduled at `scheduled`.
#[must_use]
pub fn scheduled_card(id: i64, scheduled: NaiveDateTime) -> CardSnapshot {
    CardSnapshot::new(card_id(id), "Release checklist")
        .with_description("Tag and publish")
        .with_scheduled_date(scheduled)
}
