//! Adapter implementations for synchronization status persistence.

pub mod memory;
pub mod postgres;
