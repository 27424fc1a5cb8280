//! Lock-free counters shared by concurrent lifecycle calls.

use crate::coordinator::domain::{IntegrationCounts, IntegrationStats};
use crate::event::domain::EventKind;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

const NO_INTEGRATION: i64 = i64::MIN;

#[derive(Debug)]
pub(super) struct IntegrationCounters {
    successful: AtomicU64,
    failed: AtomicU64,
    scheduled: AtomicU64,
    unscheduled: AtomicU64,
    updated: AtomicU64,
    moved: AtomicU64,
    deleted: AtomicU64,
    last_integration_millis: AtomicI64,
    started_at: DateTime<Utc>,
}

impl IntegrationCounters {
    pub(super) const fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            successful: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            scheduled: AtomicU64::new(0),
            unscheduled: AtomicU64::new(0),
            updated: AtomicU64::new(0),
            moved: AtomicU64::new(0),
            deleted: AtomicU64::new(0),
            last_integration_millis: AtomicI64::new(NO_INTEGRATION),
            started_at,
        }
    }

    pub(super) fn record_success(&self, tallies: &[EventKind], at: DateTime<Utc>) {
        for kind in tallies {
            self.tally(*kind).fetch_add(1, Ordering::Relaxed);
        }
        self.successful.fetch_add(1, Ordering::Relaxed);
        self.last_integration_millis
            .fetch_max(at.timestamp_millis(), Ordering::Relaxed);
    }

    pub(super) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn snapshot(&self, captured_at: DateTime<Utc>) -> IntegrationStats {
        let counts = IntegrationCounts {
            successful: self.successful.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            scheduled: self.scheduled.load(Ordering::Relaxed),
            unscheduled: self.unscheduled.load(Ordering::Relaxed),
            updated: self.updated.load(Ordering::Relaxed),
            moved: self.moved.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
        };
        let last = match self.last_integration_millis.load(Ordering::Relaxed) {
            NO_INTEGRATION => None,
            millis => DateTime::from_timestamp_millis(millis),
        };
        IntegrationStats::new(counts, last, self.started_at, captured_at)
    }

    const fn tally(&self, kind: EventKind) -> &AtomicU64 {
        match kind {
            EventKind::Scheduled => &self.scheduled,
            EventKind::Unscheduled => &self.unscheduled,
            EventKind::Updated => &self.updated,
            EventKind::Moved => &self.moved,
            EventKind::Deleted => &self.deleted,
        }
    }
}
