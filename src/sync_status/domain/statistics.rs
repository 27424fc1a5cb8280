//! Aggregate view over persisted synchronization rows.

use super::{IntegrationType, SyncStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts of status rows by state and integration at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatistics {
    total: u64,
    pending: u64,
    synced: u64,
    retry: u64,
    error: u64,
    by_integration: BTreeMap<IntegrationType, u64>,
    generated_at: DateTime<Utc>,
}

impl SyncStatistics {
    /// Builds statistics from per-status and per-integration counts.
    #[must_use]
    pub fn new(
        by_status: impl IntoIterator<Item = (SyncStatus, u64)>,
        by_integration: BTreeMap<IntegrationType, u64>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut statistics = Self {
            total: 0,
            pending: 0,
            synced: 0,
            retry: 0,
            error: 0,
            by_integration,
            generated_at,
        };
        for (status, count) in by_status {
            let slot = match status {
                SyncStatus::Pending => &mut statistics.pending,
                SyncStatus::Synced => &mut statistics.synced,
                SyncStatus::Retry => &mut statistics.retry,
                SyncStatus::Error => &mut statistics.error,
            };
            *slot = slot.saturating_add(count);
            statistics.total = statistics.total.saturating_add(count);
        }
        statistics
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the number of rows in `status`.
    #[must_use]
    pub const fn count(&self, status: SyncStatus) -> u64 {
        match status {
            SyncStatus::Pending => self.pending,
            SyncStatus::Synced => self.synced,
            SyncStatus::Retry => self.retry,
            SyncStatus::Error => self.error,
        }
    }

    /// Returns the number of rows for `integration_type`.
    #[must_use]
    pub fn count_for(&self, integration_type: IntegrationType) -> u64 {
        self.by_integration
            .get(&integration_type)
            .copied()
            .unwrap_or(0)
    }

    /// Returns when the statistics were computed.
    #[must_use]
    pub const fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Returns rows still being worked on (`PENDING` + `RETRY`).
    #[must_use]
    pub const fn active(&self) -> u64 {
        self.pending + self.retry
    }

    /// Returns rows whose cycle ended (`SYNCED` + `ERROR`).
    #[must_use]
    pub const fn finalized(&self) -> u64 {
        self.synced + self.error
    }

    /// Returns the percentage of `SYNCED` rows.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        self.percentage(self.synced)
    }

    /// Returns the percentage of `ERROR` rows.
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        self.percentage(self.error)
    }

    /// Returns the percentage of `PENDING` rows.
    #[must_use]
    pub fn pending_rate(&self) -> f64 {
        self.percentage(self.pending)
    }

    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "rates are reported as floating-point percentages"
    )]
    fn percentage(&self, part: u64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        part as f64 * 100.0 / self.total as f64
    }
}
