//! Retry policy parameters and backoff arithmetic.

use super::FailureKind;
use rand::Rng;
use std::collections::BTreeSet;
use std::time::Duration;

/// Retry policy applied to one external operation.
///
/// Non-retryable kinds take precedence over retryable ones; kinds that
/// appear in neither set are not retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f64,
    jitter: bool,
    max_retry_duration: Option<Duration>,
    retryable: BTreeSet<FailureKind>,
    non_retryable: BTreeSet<FailureKind>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(300),
            backoff_multiplier: 2.0,
            jitter: true,
            max_retry_duration: None,
            retryable: BTreeSet::from([
                FailureKind::Connection,
                FailureKind::Timeout,
                FailureKind::Io,
            ]),
            non_retryable: BTreeSet::from([
                FailureKind::InvalidArgument,
                FailureKind::Unsupported,
                FailureKind::Security,
            ]),
        }
    }
}

impl RetryConfig {
    /// Policy for operations that must eventually land: more attempts,
    /// gentler growth and a one hour budget.
    #[must_use]
    pub fn critical() -> Self {
        Self::default()
            .with_max_attempts(5)
            .with_initial_delay(Duration::from_secs(2))
            .with_max_delay(Duration::from_secs(600))
            .with_backoff_multiplier(1.5)
            .with_max_retry_duration(Duration::from_secs(3600))
    }

    /// Policy for latency-sensitive operations.
    #[must_use]
    pub fn fast() -> Self {
        Self::default()
            .with_max_attempts(2)
            .with_initial_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_secs(5))
            .with_max_retry_duration(Duration::from_secs(300))
    }

    /// Sets the total number of attempts, clamped to at least one.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the delay before the second attempt.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the upper bound for any single delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the growth factor between delays, clamped to at least 1.0.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = if multiplier.is_finite() && multiplier >= 1.0 {
            multiplier
        } else {
            1.0
        };
        self
    }

    /// Enables or disables randomized delay damping.
    #[must_use]
    pub const fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Bounds the wall time spent retrying.
    #[must_use]
    pub const fn with_max_retry_duration(mut self, budget: Duration) -> Self {
        self.max_retry_duration = Some(budget);
        self
    }

    /// Replaces the set of retryable failure kinds.
    #[must_use]
    pub fn with_retryable(mut self, kinds: impl IntoIterator<Item = FailureKind>) -> Self {
        self.retryable = kinds.into_iter().collect();
        self
    }

    /// Replaces the set of non-retryable failure kinds.
    #[must_use]
    pub fn with_non_retryable(mut self, kinds: impl IntoIterator<Item = FailureKind>) -> Self {
        self.non_retryable = kinds.into_iter().collect();
        self
    }

    /// Returns the total number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay before the second attempt.
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Returns the upper bound for any single delay.
    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Returns the growth factor between delays.
    #[must_use]
    pub const fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    /// Returns `true` when delays are randomly damped.
    #[must_use]
    pub const fn jitter(&self) -> bool {
        self.jitter
    }

    /// Returns the wall time budget, if any.
    #[must_use]
    pub const fn max_retry_duration(&self) -> Option<Duration> {
        self.max_retry_duration
    }

    /// Decides whether a failure of `kind` deserves another attempt.
    #[must_use]
    pub fn is_retryable(&self, kind: FailureKind) -> bool {
        !self.non_retryable.contains(&kind) && self.retryable.contains(&kind)
    }

    /// Returns the exponential delay that follows attempt number `attempt`.
    ///
    /// `delay(n) = min(max_delay, initial_delay * multiplier^(n - 1))`,
    /// damped by a uniform factor in `[0.5, 1.0]` when jitter is enabled.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.backoff_delay(attempt);
        if self.jitter {
            Self::apply_jitter(base)
        } else {
            base
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "backoff growth is defined over a fractional multiplier"
    )]
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let scaled = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::try_from_secs_f64(scaled)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "jitter scales the delay by a random fraction"
    )]
    fn apply_jitter(delay: Duration) -> Duration {
        let factor: f64 = rand::rng().random_range(0.5..=1.0);
        Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(delay)
    }
}
