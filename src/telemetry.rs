//! Tracing subscriber installation.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, filter::ParseError};

/// Directive used when `RUST_LOG` is unset or unreadable.
pub const DEFAULT_DIRECTIVE: &str = "card_sync=info";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback directive does not parse.
    #[error("invalid tracing directive: {0}")]
    InvalidDirective(#[from] ParseError),
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Installs a formatted subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_DIRECTIVE`].
///
/// # Errors
///
/// Returns [`TelemetryError::Install`] when a global subscriber already
/// exists.
pub fn init_tracing() -> Result<(), TelemetryError> {
    init_tracing_with(DEFAULT_DIRECTIVE)
}

/// Installs a formatted subscriber filtered by `RUST_LOG`, falling back
/// to `default_directive`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidDirective`] when `RUST_LOG` is unset
/// and `default_directive` does not parse, or
/// [`TelemetryError::Install`] when a global subscriber already exists.
pub fn init_tracing_with(default_directive: &str) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(TelemetryError::Install)
}
