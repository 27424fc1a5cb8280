//! Step definitions for synchronization status lifecycle scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
