//! Unit tests for the integration coordinator.
