//! Retry loop orchestration.

mod executor;

pub use executor::RetryExecutor;
