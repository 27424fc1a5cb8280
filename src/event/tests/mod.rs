//! Unit tests for domain events and their dispatch.
