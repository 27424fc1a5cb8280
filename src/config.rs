//! Engine configuration loaded from JSON.
//!
//! Every field has a default, so `{}` is a valid configuration.

use crate::retry::domain::{RetryConfig, RetryStrategy};
use crate::sync_status::domain::DEFAULT_MAX_RETRIES;
use crate::synchronizer::services::{CALENDAR_PRIORITY, DEFAULT_TASK_LIST, TASK_LIST_PRIORITY};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its permitted range.
    #[error("invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Offending field, as a dotted path.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Retry policy settings with millisecond durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    /// Backoff strategy.
    pub strategy: RetryStrategy,
    /// Total attempts, first call included.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay.
    pub max_delay_ms: u64,
    /// Exponential growth factor.
    pub backoff_multiplier: f64,
    /// Randomize delays between half and all of their computed value.
    pub jitter: bool,
    /// Overall time budget for one retry run.
    pub max_retry_duration_ms: Option<u64>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let config = RetryConfig::default();
        Self {
            strategy: RetryStrategy::default(),
            max_attempts: config.max_attempts(),
            initial_delay_ms: millis(config.initial_delay()),
            max_delay_ms: millis(config.max_delay()),
            backoff_multiplier: config.backoff_multiplier(),
            jitter: config.jitter(),
            max_retry_duration_ms: config.max_retry_duration().map(millis),
        }
    }
}

impl RetrySettings {
    /// Converts the settings into a [`RetryConfig`].
    #[must_use]
    pub fn to_retry_config(&self) -> RetryConfig {
        let mut config = RetryConfig::default()
            .with_max_attempts(self.max_attempts)
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
            .with_backoff_multiplier(self.backoff_multiplier)
            .with_jitter(self.jitter);
        if let Some(budget) = self.max_retry_duration_ms {
            config = config.with_max_retry_duration(Duration::from_millis(budget));
        }
        config
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(invalid("retry.max_attempts", "must be at least 1"));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(invalid(
                "retry.backoff_multiplier",
                "must be a finite number of at least 1.0",
            ));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(invalid(
                "retry.initial_delay_ms",
                "must not exceed retry.max_delay_ms",
            ));
        }
        Ok(())
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncEngineConfig {
    /// Retry policy for external calls.
    pub retry: RetrySettings,
    /// Retry budget given to new status rows.
    pub default_max_retries: u32,
    /// Task list used for cards without a board name.
    pub default_task_list: String,
    /// Dispatch priority of the calendar synchronizer.
    pub calendar_priority: i32,
    /// Dispatch priority of the task list synchronizer.
    pub task_list_priority: i32,
}

impl Default for SyncEngineConfig {
    fn default() -> Self {
        Self {
            retry: RetrySettings::default(),
            default_max_retries: DEFAULT_MAX_RETRIES,
            default_task_list: DEFAULT_TASK_LIST.to_owned(),
            calendar_priority: CALENDAR_PRIORITY,
            task_list_priority: TASK_LIST_PRIORITY,
        }
    }
}

impl SyncEngineConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields
    /// and [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.retry.validate()?;
        if self.default_max_retries == 0 {
            return Err(invalid("default_max_retries", "must be at least 1"));
        }
        if self.default_task_list.trim().is_empty() {
            return Err(invalid("default_task_list", "must not be blank"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_owned(),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
