//! Retry and backoff resilience layer for external service calls.
//!
//! Failures are classified into [`domain::FailureKind`] values at the call
//! site; [`domain::RetryConfig`] decides which kinds are worth another
//! attempt and how long to wait before it. The
//! [`services::RetryExecutor`] drives an async operation through that
//! policy, suspending on a `tokio` timer between attempts and honouring a
//! cancellation token.
//!
//! - Policy and history types in [`domain`]
//! - The attempt loop in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
