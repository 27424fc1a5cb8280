//! Terminal summary of a retry loop.

use super::{CapturedError, FailureKind, RetryAttempt, RetryContext};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of running an operation through a retry policy.
#[derive(Debug, Clone)]
pub struct RetryResult<T> {
    retry_id: String,
    operation: String,
    value: Option<T>,
    final_error: Option<CapturedError>,
    attempts: Vec<RetryAttempt>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    total_duration: Duration,
}

impl<T> RetryResult<T> {
    /// Builds a successful result from the finished loop state.
    #[must_use]
    pub fn succeeded(context: RetryContext, value: T, finished_at: DateTime<Utc>) -> Self {
        Self::from_context(context, Some(value), None, finished_at)
    }

    /// Builds a failed result carrying the last error.
    #[must_use]
    pub fn failed(context: RetryContext, error: CapturedError, finished_at: DateTime<Utc>) -> Self {
        Self::from_context(context, None, Some(error), finished_at)
    }

    fn from_context(
        context: RetryContext,
        value: Option<T>,
        final_error: Option<CapturedError>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let total_duration = context.elapsed();
        let retry_id = context.retry_id().to_owned();
        let operation = context.operation().to_owned();
        let started_at = context.started_at();
        Self {
            retry_id,
            operation,
            value,
            final_error,
            attempts: context.into_attempts(),
            started_at,
            finished_at,
            total_duration,
        }
    }

    /// Returns the retry identifier.
    #[must_use]
    pub fn retry_id(&self) -> &str {
        &self.retry_id
    }

    /// Returns the operation name.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns `true` when an attempt produced a value.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the produced value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns the error that ended a failed loop.
    #[must_use]
    pub const fn final_error(&self) -> Option<&CapturedError> {
        self.final_error.as_ref()
    }

    /// Returns the full attempt history.
    #[must_use]
    pub fn attempts(&self) -> &[RetryAttempt] {
        &self.attempts
    }

    /// Returns the number of invocations made.
    #[must_use]
    pub fn total_attempts(&self) -> usize {
        self.attempts.len()
    }

    /// Returns the number of attempts that produced a value.
    #[must_use]
    pub fn successful_attempts(&self) -> usize {
        self.attempts.iter().filter(|a| a.is_success()).count()
    }

    /// Returns the number of attempts that failed.
    #[must_use]
    pub fn failed_attempts(&self) -> usize {
        self.attempts.iter().filter(|a| !a.is_success()).count()
    }

    /// Returns the mean invocation time, ignoring backoff waits.
    #[must_use]
    pub fn average_attempt_duration(&self) -> Duration {
        let total: Duration = self.attempts.iter().map(RetryAttempt::duration).sum();
        u32::try_from(self.attempts.len())
            .ok()
            .and_then(|count| total.checked_div(count))
            .unwrap_or_default()
    }

    /// Returns the backoff waits in the order they happened.
    #[must_use]
    pub fn recorded_delays(&self) -> Vec<Duration> {
        self.attempts
            .iter()
            .filter_map(RetryAttempt::delay_before_next)
            .collect()
    }

    /// Returns when the loop started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns when the loop finished.
    #[must_use]
    pub const fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Returns the elapsed time including backoff waits.
    #[must_use]
    pub const fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Returns a one-line human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        self.final_error.as_ref().map_or_else(
            || {
                format!(
                    "{} ({}) succeeded after {} attempt(s) in {:?}",
                    self.operation,
                    self.retry_id,
                    self.total_attempts(),
                    self.total_duration
                )
            },
            |err| {
                format!(
                    "{} ({}) failed after {} attempt(s) in {:?}: {err}",
                    self.operation,
                    self.retry_id,
                    self.total_attempts(),
                    self.total_duration
                )
            },
        )
    }

    /// Consumes the result, yielding the value or the final error.
    ///
    /// # Errors
    ///
    /// Returns the final [`CapturedError`] when no attempt succeeded.
    pub fn into_value(self) -> Result<T, CapturedError> {
        match (self.value, self.final_error) {
            (Some(value), _) => Ok(value),
            (None, Some(err)) => Err(err),
            (None, None) => Err(CapturedError::new(
                FailureKind::Unknown,
                "retry loop finished without an outcome",
            )),
        }
    }
}
