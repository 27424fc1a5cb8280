//! Unit tests for retry policies and the retry loop.
