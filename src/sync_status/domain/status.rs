//! Convergence state of one (card, integration) pair.

use super::ParseSyncStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Synchronization state machine.
///
/// `PENDING` and `RETRY` may move to `SYNCED`, `RETRY` or `ERROR`.
/// `SYNCED` and `ERROR` end a synchronization cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    /// Awaiting the first attempt of the cycle.
    Pending,
    /// The external artifact matches the card.
    Synced,
    /// A retryable failure happened and budget remains.
    Retry,
    /// A fatal failure happened or the budget ran out.
    Error,
}

impl SyncStatus {
    /// Every status value.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Synced, Self::Retry, Self::Error];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Synced => "SYNCED",
            Self::Retry => "RETRY",
            Self::Error => "ERROR",
        }
    }

    /// Returns a human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Pending => "waiting for synchronization",
            Self::Synced => "synchronized",
            Self::Retry => "waiting for retry",
            Self::Error => "synchronization failed",
        }
    }

    /// Returns `true` for states that end a cycle.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Synced | Self::Error)
    }

    /// Returns `true` for states still being worked on.
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::Pending | Self::Retry)
    }

    /// Returns `true` for states a reconciliation sweep may re-drive.
    #[must_use]
    pub const fn allows_retry(self) -> bool {
        matches!(self, Self::Retry | Self::Error)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SyncStatus {
    type Error = ParseSyncStatusError;

    fn try_from(value: &str) -> Result<Self, ParseSyncStatusError> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "PENDING" => Ok(Self::Pending),
            "SYNCED" => Ok(Self::Synced),
            "RETRY" => Ok(Self::Retry),
            "ERROR" => Ok(Self::Error),
            _ => Err(ParseSyncStatusError(value.to_owned())),
        }
    }
}
