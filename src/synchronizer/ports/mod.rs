//! Contracts for the external systems cards are mirrored into.

mod calendar;
mod error;
mod task_list;

pub use calendar::CalendarService;
pub use error::{ExternalServiceError, ExternalServiceResult};
pub use task_list::TaskListService;
