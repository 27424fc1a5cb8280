//! Event dispatch services.

mod publisher;

pub use publisher::{DispatchFailure, DispatchReport, EventPublisher, PublishError};
