//! Immutable snapshot of coordinator counters.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Counters captured at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationStats {
    successful: u64,
    failed: u64,
    scheduled: u64,
    unscheduled: u64,
    updated: u64,
    moved: u64,
    deleted: u64,
    last_integration_at: Option<DateTime<Utc>>,
    started_at: DateTime<Utc>,
    captured_at: DateTime<Utc>,
}

/// Raw counter values handed to [`IntegrationStats::new`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationCounts {
    /// Lifecycle operations that published successfully.
    pub successful: u64,
    /// Lifecycle operations that failed.
    pub failed: u64,
    /// Scheduling operations.
    pub scheduled: u64,
    /// Unscheduling operations, deletions included.
    pub unscheduled: u64,
    /// Update operations, moves included.
    pub updated: u64,
    /// Column moves.
    pub moved: u64,
    /// Deletions.
    pub deleted: u64,
}

impl IntegrationStats {
    /// Builds a snapshot.
    #[must_use]
    pub const fn new(
        counts: IntegrationCounts,
        last_integration_at: Option<DateTime<Utc>>,
        started_at: DateTime<Utc>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            successful: counts.successful,
            failed: counts.failed,
            scheduled: counts.scheduled,
            unscheduled: counts.unscheduled,
            updated: counts.updated,
            moved: counts.moved,
            deleted: counts.deleted,
            last_integration_at,
            started_at,
            captured_at,
        }
    }

    /// Successful lifecycle operations.
    #[must_use]
    pub const fn successful(&self) -> u64 {
        self.successful
    }

    /// Failed lifecycle operations.
    #[must_use]
    pub const fn failed(&self) -> u64 {
        self.failed
    }

    /// Scheduling operations that succeeded.
    #[must_use]
    pub const fn scheduled(&self) -> u64 {
        self.scheduled
    }

    /// Unscheduling operations that succeeded, deletions included.
    #[must_use]
    pub const fn unscheduled(&self) -> u64 {
        self.unscheduled
    }

    /// Update operations that succeeded, moves included.
    #[must_use]
    pub const fn updated(&self) -> u64 {
        self.updated
    }

    /// Column moves that succeeded.
    #[must_use]
    pub const fn moved(&self) -> u64 {
        self.moved
    }

    /// Deletions that succeeded.
    #[must_use]
    pub const fn deleted(&self) -> u64 {
        self.deleted
    }

    /// Time of the most recent successful operation.
    #[must_use]
    pub const fn last_integration_at(&self) -> Option<DateTime<Utc>> {
        self.last_integration_at
    }

    /// Time the coordinator was created.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time this snapshot was taken.
    #[must_use]
    pub const fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Successful plus failed operations.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.successful.saturating_add(self.failed)
    }

    /// Returns `true` once any operation has been attempted.
    #[must_use]
    pub const fn has_integrations(&self) -> bool {
        self.total() > 0
    }

    /// Percentage of operations that succeeded; `0.0` before any ran.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        percentage(self.successful, self.total())
    }

    /// Percentage of operations that failed; `0.0` before any ran.
    #[must_use]
    pub fn failure_rate(&self) -> f64 {
        percentage(self.failed, self.total())
    }

    /// Time between coordinator start and this snapshot.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.captured_at
            .signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    /// Operations per minute since start; `0.0` within the first instant.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "rates are reporting values where f64 precision is sufficient"
    )]
    pub fn integrations_per_minute(&self) -> f64 {
        let minutes = self.elapsed().as_secs_f64() / 60.0;
        if minutes > 0.0 {
            self.total() as f64 / minutes
        } else {
            0.0
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "rates are reporting values where f64 precision is sufficient"
)]
fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
