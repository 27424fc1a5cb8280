//! Coordinator statistics.

mod stats;

pub use stats::{IntegrationCounts, IntegrationStats};
