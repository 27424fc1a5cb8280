//! Record of a single invocation inside a retry loop.

use super::CapturedError;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The operation returned a value.
    Succeeded,
    /// The operation failed with the captured error.
    Failed(CapturedError),
}

/// Timestamped record of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAttempt {
    number: u32,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    duration: Duration,
    outcome: AttemptOutcome,
    delay_before_next: Option<Duration>,
}

impl RetryAttempt {
    /// Creates an attempt record.
    #[must_use]
    pub const fn new(
        number: u32,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        duration: Duration,
        outcome: AttemptOutcome,
    ) -> Self {
        Self {
            number,
            started_at,
            finished_at,
            duration,
            outcome,
            delay_before_next: None,
        }
    }

    /// Returns the one-based attempt number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Returns when the attempt started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns when the attempt finished.
    #[must_use]
    pub const fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Returns how long the invocation ran.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the attempt outcome.
    #[must_use]
    pub const fn outcome(&self) -> &AttemptOutcome {
        &self.outcome
    }

    /// Returns `true` when the attempt produced a value.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Succeeded)
    }

    /// Returns the captured error of a failed attempt.
    #[must_use]
    pub const fn error(&self) -> Option<&CapturedError> {
        match &self.outcome {
            AttemptOutcome::Succeeded => None,
            AttemptOutcome::Failed(err) => Some(err),
        }
    }

    /// Returns the backoff that followed this attempt, if another one ran.
    #[must_use]
    pub const fn delay_before_next(&self) -> Option<Duration> {
        self.delay_before_next
    }

    pub(crate) const fn set_delay_before_next(&mut self, delay: Duration) {
        self.delay_before_next = Some(delay);
    }
}
