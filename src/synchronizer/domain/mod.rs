//! External representations of cards and the rules that derive them.

mod calendar_event;
mod external_task;
mod presentation;

pub use calendar_event::CalendarEvent;
pub use external_task::ExternalTask;
pub use presentation::{EventPriority, urgency_color};
