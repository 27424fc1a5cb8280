//! Backoff strategies.

use super::{RetryConfig, RetryContext};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How the wait between attempts evolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryStrategy {
    /// Delays grow geometrically up to the configured cap.
    #[default]
    ExponentialBackoff,
    /// Every wait uses the initial delay.
    FixedDelay,
}

impl RetryStrategy {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExponentialBackoff => "exponential_backoff",
            Self::FixedDelay => "fixed_delay",
        }
    }

    /// Returns the wait that follows attempt number `attempt`.
    #[must_use]
    pub fn delay_for(self, config: &RetryConfig, attempt: u32) -> Duration {
        match self {
            Self::ExponentialBackoff => config.delay_for_attempt(attempt),
            Self::FixedDelay => config.initial_delay(),
        }
    }

    /// Decides whether the operation tracked by `context` gets another
    /// attempt.
    ///
    /// Requires attempts left, time left within the retry budget and a
    /// retryable last failure.
    #[must_use]
    pub fn should_retry(self, context: &RetryContext) -> bool {
        let config = context.config();
        if context.current_attempt() >= config.max_attempts() {
            return false;
        }
        if let Some(budget) = config.max_retry_duration()
            && context.elapsed() >= budget
        {
            return false;
        }
        context
            .last_error()
            .is_some_and(|err| config.is_retryable(err.kind()))
    }
}

impl fmt::Display for RetryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
