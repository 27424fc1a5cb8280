//! Mutable state of one retry loop.

use super::{CapturedError, RetryAttempt, RetryConfig};
use crate::card::CardId;
use crate::sync_status::domain::IntegrationType;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const RETRY_ID_PREFIX: &str = "retry-";
const RETRY_ID_SUFFIX_LEN: usize = 8;

/// Identity, policy and history of an operation being retried.
#[derive(Debug, Clone)]
pub struct RetryContext {
    retry_id: String,
    operation: String,
    entity_id: Option<CardId>,
    integration_type: Option<IntegrationType>,
    current_attempt: u32,
    started_at: DateTime<Utc>,
    started: Instant,
    attempts: Vec<RetryAttempt>,
    config: RetryConfig,
    metadata: BTreeMap<String, String>,
    cancellation: CancellationToken,
}

impl RetryContext {
    /// Starts a context for `operation` at attempt one.
    #[must_use]
    pub fn new(operation: impl Into<String>, config: RetryConfig, clock: &impl Clock) -> Self {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(RETRY_ID_SUFFIX_LEN)
            .collect();
        Self {
            retry_id: format!("{RETRY_ID_PREFIX}{suffix}"),
            operation: operation.into(),
            entity_id: None,
            integration_type: None,
            current_attempt: 1,
            started_at: clock.utc(),
            started: Instant::now(),
            attempts: Vec::new(),
            config,
            metadata: BTreeMap::new(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Associates the card the operation acts on.
    #[must_use]
    pub const fn with_entity(mut self, entity_id: CardId) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    /// Associates the integration the operation targets.
    #[must_use]
    pub const fn with_integration(mut self, integration_type: IntegrationType) -> Self {
        self.integration_type = Some(integration_type);
        self
    }

    /// Uses `token` to cancel the backoff wait.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Attaches a free-form metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the generated retry identifier.
    #[must_use]
    pub fn retry_id(&self) -> &str {
        &self.retry_id
    }

    /// Returns the operation name.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns the associated card, if any.
    #[must_use]
    pub const fn entity_id(&self) -> Option<CardId> {
        self.entity_id
    }

    /// Returns the associated integration, if any.
    #[must_use]
    pub const fn integration_type(&self) -> Option<IntegrationType> {
        self.integration_type
    }

    /// Returns the one-based number of the attempt in progress.
    #[must_use]
    pub const fn current_attempt(&self) -> u32 {
        self.current_attempt
    }

    /// Returns when the loop started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the time spent since the loop started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns the recorded attempts.
    #[must_use]
    pub fn attempts(&self) -> &[RetryAttempt] {
        &self.attempts
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Returns a metadata entry.
    #[must_use]
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Returns the cancellation token.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Returns the error of the most recent attempt, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&CapturedError> {
        self.attempts.last().and_then(RetryAttempt::error)
    }

    pub(crate) fn record_attempt(&mut self, attempt: RetryAttempt) {
        self.attempts.push(attempt);
    }

    pub(crate) fn advance(&mut self, delay: Duration) {
        if let Some(last) = self.attempts.last_mut() {
            last.set_delay_before_next(delay);
        }
        self.current_attempt = self.current_attempt.saturating_add(1);
    }

    pub(crate) fn into_attempts(self) -> Vec<RetryAttempt> {
        self.attempts
    }
}
