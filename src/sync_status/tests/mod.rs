//! Unit tests for synchronization status tracking.
