//! Adapter implementations for external service ports.

pub mod memory;
