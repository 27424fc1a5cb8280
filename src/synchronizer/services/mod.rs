//! Synchronizer services.
//!
//! [`CalendarSynchronizer`] and [`TaskListSynchronizer`] translate domain
//! events into external calls; [`Synchronizer`] is the closed set the
//! event publisher dispatches to.

mod calendar;
mod dispatch;
mod error;
mod runner;
mod task_list;

pub use calendar::{CALENDAR_PRIORITY, CalendarSynchronizer};
pub use dispatch::Synchronizer;
pub use error::{SynchronizerError, SynchronizerResult};
pub use runner::SyncRunner;
pub use task_list::{DEFAULT_TASK_LIST, TASK_LIST_PRIORITY, TaskListSynchronizer};
