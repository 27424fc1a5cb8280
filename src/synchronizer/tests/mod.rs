//! Unit tests for card synchronizers.


use crate::card::{CardId, CardSnapshot, UrgencyLevel};
use crate::retry::domain::RetryConfig;
use crate::sync_status::adapters::memory::InMemorySyncStatusRepository;
use crate::synchronizer::services::SyncRunner;
use chrono::{NaiveDate, NaiveDateTime};
use mockable::DefaultClock;
use std::sync::Arc;
use std::time::Duration;

type TestRunner = SyncRunner<InMemorySyncStatusRepository, DefaultClock>;

fn card_id(id: i64) -> CardId {
    CardId::new(id).expect("valid card id")
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

fn scheduled_card(id: i64, scheduled: NaiveDateTime) -> CardSnapshot {
    CardSnapshot::new(card_id(id), "Write report")
        .with_description("Quarterly numbers")
        .with_scheduled_date(scheduled)
        .with_urgency(UrgencyLevel::NONE)
}

/// Short, deterministic backoff so retrying tests stay fast.
fn quick_retries() -> RetryConfig {
    RetryConfig::default()
        .with_initial_delay(Duration::from_millis(5))
        .with_max_delay(Duration::from_millis(20))
        .with_jitter(false)
}

fn runner(repository: &Arc<InMemorySyncStatusRepository>) -> TestRunner {
    SyncRunner::new(Arc::clone(repository), Arc::new(DefaultClock), quick_retries())
}
