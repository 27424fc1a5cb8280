//! Async retry loop driven by a [`RetryStrategy`].

use crate::retry::domain::{
    AttemptOutcome, CapturedError, ClassifiedError, FailureKind, RetryAttempt, RetryContext,
    RetryResult, RetryStrategy,
};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Runs fallible async operations under a retry policy.
#[derive(Debug, Clone)]
pub struct RetryExecutor<C>
where
    C: Clock + Send + Sync,
{
    strategy: RetryStrategy,
    clock: Arc<C>,
}

impl<C> RetryExecutor<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an executor using `strategy` for backoff decisions.
    #[must_use]
    pub const fn new(strategy: RetryStrategy, clock: Arc<C>) -> Self {
        Self { strategy, clock }
    }

    /// Returns the backoff strategy.
    #[must_use]
    pub const fn strategy(&self) -> RetryStrategy {
        self.strategy
    }

    /// Invokes `operation` until it succeeds or the policy in `context`
    /// stops retrying.
    ///
    /// The wait between attempts is a `tokio` timer raced against the
    /// context's cancellation token; cancelling ends the loop with an
    /// [`FailureKind::Interrupted`] error.
    pub async fn execute<T, E, F, Fut>(
        &self,
        mut context: RetryContext,
        mut operation: F,
    ) -> RetryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: ClassifiedError,
    {
        loop {
            let attempt_number = context.current_attempt();
            let started_at = self.clock.utc();
            let timer = Instant::now();
            let outcome = operation().await;
            let duration = timer.elapsed();
            let finished_at = self.clock.utc();

            let err = match outcome {
                Ok(value) => {
                    context.record_attempt(RetryAttempt::new(
                        attempt_number,
                        started_at,
                        finished_at,
                        duration,
                        AttemptOutcome::Succeeded,
                    ));
                    if attempt_number > 1 {
                        info!(
                            retry_id = context.retry_id(),
                            operation = context.operation(),
                            attempt = attempt_number,
                            "operation succeeded after retrying"
                        );
                    }
                    return RetryResult::succeeded(context, value, finished_at);
                }
                Err(err) => CapturedError::capture(&err),
            };

            warn!(
                retry_id = context.retry_id(),
                operation = context.operation(),
                attempt = attempt_number,
                kind = %err.kind(),
                error = err.message(),
                "attempt failed"
            );
            context.record_attempt(RetryAttempt::new(
                attempt_number,
                started_at,
                finished_at,
                duration,
                AttemptOutcome::Failed(err.clone()),
            ));

            if !self.strategy.should_retry(&context) {
                debug!(
                    retry_id = context.retry_id(),
                    attempts = attempt_number,
                    "retry policy exhausted or failure not retryable"
                );
                return RetryResult::failed(context, err, self.clock.utc());
            }

            let delay = self.strategy.delay_for(context.config(), attempt_number);
            debug!(
                retry_id = context.retry_id(),
                attempt = attempt_number,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "backing off before next attempt"
            );
            let token = context.cancellation().clone();
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    warn!(retry_id = context.retry_id(), "retry cancelled during backoff");
                    let interrupted =
                        CapturedError::new(FailureKind::Interrupted, "retry cancelled during backoff");
                    return RetryResult::failed(context, interrupted, self.clock.utc());
                }
                () = tokio::time::sleep(delay) => {}
            }
            context.advance(delay);
        }
    }
}
