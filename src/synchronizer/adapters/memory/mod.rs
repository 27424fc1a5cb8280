//! In-memory external services for tests and local runs.
//!
//! Both services can be scripted to fail their next calls so retry and
//! isolation behaviour can be exercised deterministically.

mod calendar;
mod task_list;

pub use calendar::InMemoryCalendarService;
pub use task_list::InMemoryTaskListService;

use crate::retry::domain::FailureKind;
use crate::synchronizer::ports::{ExternalServiceError, ExternalServiceResult};
use std::collections::VecDeque;

/// Failures queued for upcoming calls, consumed one per call.
#[derive(Debug, Default)]
struct ScriptedFailures {
    queue: VecDeque<ExternalServiceError>,
    calls: u64,
}

impl ScriptedFailures {
    fn push(&mut self, err: ExternalServiceError) {
        self.queue.push_back(err);
    }

    fn begin_call(&mut self) -> ExternalServiceResult<()> {
        self.calls = self.calls.saturating_add(1);
        self.queue.pop_front().map_or(Ok(()), Err)
    }
}

fn lock_error(err: &impl std::fmt::Display) -> ExternalServiceError {
    ExternalServiceError::new(FailureKind::Io, err.to_string())
}
