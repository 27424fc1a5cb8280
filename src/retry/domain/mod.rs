//! Domain model for retry policies and attempt history.

mod attempt;
mod config;
mod context;
mod failure;
mod result;
mod strategy;

pub use attempt::{AttemptOutcome, RetryAttempt};
pub use config::RetryConfig;
pub use context::RetryContext;
pub use failure::{CapturedError, ClassifiedError, FailureKind};
pub use result::RetryResult;
pub use strategy::RetryStrategy;
