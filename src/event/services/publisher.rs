//! In-process publisher fanning domain events out to synchronizers.

use crate::card::CardId;
use crate::event::domain::{DomainEvent, EventKind};
use crate::sync_status::ports::SyncStatusRepository;
use crate::synchronizer::services::{Synchronizer, SynchronizerError};
use mockable::Clock;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// One synchronizer's failure during dispatch.
#[derive(Debug, Error)]
#[error("synchronizer {name} failed: {error}")]
pub struct DispatchFailure {
    name: &'static str,
    #[source]
    error: SynchronizerError,
}

impl DispatchFailure {
    /// Returns the failing synchronizer's name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the synchronizer error.
    #[must_use]
    pub const fn error(&self) -> &SynchronizerError {
        &self.error
    }
}

/// Every synchronizer failure of one dispatch.
///
/// The first failure is the error source; the rest stay reachable through
/// [`PublishError::failures`].
#[derive(Debug, Error)]
#[error("dispatch of {kind} for card {entity_id} failed: {primary}")]
pub struct PublishError {
    kind: EventKind,
    entity_id: CardId,
    delivered: Vec<&'static str>,
    #[source]
    primary: Box<DispatchFailure>,
    additional: Vec<DispatchFailure>,
}

impl PublishError {
    fn from_failures(
        event: &DomainEvent,
        delivered: Vec<&'static str>,
        failures: Vec<DispatchFailure>,
    ) -> Result<DispatchReport, Self> {
        let mut remaining = failures.into_iter();
        let Some(primary) = remaining.next() else {
            return Ok(DispatchReport {
                kind: event.kind(),
                entity_id: event.entity_id(),
                delivered,
            });
        };
        Err(Self {
            kind: event.kind(),
            entity_id: event.entity_id(),
            delivered,
            primary: Box::new(primary),
            additional: remaining.collect(),
        })
    }

    /// Returns the kind of the event being dispatched.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Returns the card the event was about.
    #[must_use]
    pub const fn entity_id(&self) -> CardId {
        self.entity_id
    }

    /// Returns the first failure in dispatch order.
    #[must_use]
    pub fn primary(&self) -> &DispatchFailure {
        &self.primary
    }

    /// Returns every failure in dispatch order.
    pub fn failures(&self) -> impl Iterator<Item = &DispatchFailure> {
        std::iter::once(&*self.primary).chain(self.additional.iter())
    }

    /// Returns how many synchronizers failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.additional.len().saturating_add(1)
    }

    /// Returns the synchronizers that handled the event successfully.
    #[must_use]
    pub fn delivered(&self) -> &[&'static str] {
        &self.delivered
    }
}

/// Outcome of a dispatch in which no synchronizer failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    kind: EventKind,
    entity_id: CardId,
    delivered: Vec<&'static str>,
}

impl DispatchReport {
    /// Returns the kind of the dispatched event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Returns the card the event was about.
    #[must_use]
    pub const fn entity_id(&self) -> CardId {
        self.entity_id
    }

    /// Returns the synchronizers that ran, in dispatch order.
    #[must_use]
    pub fn delivered(&self) -> &[&'static str] {
        &self.delivered
    }
}

/// Dispatches domain events to subscribed synchronizers.
///
/// Synchronizers run one after another in ascending priority order, ties
/// keeping subscription order. A failing synchronizer does not stop the
/// others from running.
pub struct EventPublisher<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    synchronizers: RwLock<Vec<Arc<Synchronizer<R, C>>>>,
}

impl<R, C> Default for EventPublisher<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    fn default() -> Self {
        Self {
            synchronizers: RwLock::new(Vec::new()),
        }
    }
}

impl<R, C> EventPublisher<R, C>
where
    R: SyncStatusRepository,
    C: Clock + Send + Sync,
{
    /// Creates a publisher with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a synchronizer.
    ///
    /// Returns `false` and leaves the registry untouched when a
    /// synchronizer with the same name is already subscribed.
    #[must_use = "a rejected subscription leaves the synchronizer unused"]
    pub fn subscribe(&self, candidate: impl Into<Synchronizer<R, C>>) -> bool {
        let synchronizer = candidate.into();
        let mut registry = self
            .synchronizers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if registry
            .iter()
            .any(|existing| existing.name() == synchronizer.name())
        {
            warn!(name = synchronizer.name(), "synchronizer already subscribed");
            return false;
        }
        info!(
            name = synchronizer.name(),
            priority = synchronizer.priority(),
            "synchronizer subscribed"
        );
        registry.push(Arc::new(synchronizer));
        true
    }

    /// Removes the synchronizer called `name`; returns whether one was found.
    #[must_use]
    pub fn unsubscribe(&self, name: &str) -> bool {
        let mut registry = self
            .synchronizers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = registry.len();
        registry.retain(|existing| existing.name() != name);
        let removed = registry.len() != before;
        if removed {
            info!(name, "synchronizer unsubscribed");
        }
        removed
    }

    /// Returns `true` when a synchronizer called `name` is subscribed.
    #[must_use]
    pub fn is_subscribed(&self, name: &str) -> bool {
        self.synchronizers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|existing| existing.name() == name)
    }

    /// Returns the number of subscribed synchronizers.
    #[must_use]
    pub fn synchronizer_count(&self) -> usize {
        self.synchronizers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Removes every synchronizer.
    pub fn clear(&self) {
        self.synchronizers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        debug!("synchronizer registry cleared");
    }

    /// Delivers `event` to every interested synchronizer and waits for all
    /// of them.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] listing each synchronizer that failed once
    /// all of them have run.
    pub async fn publish(&self, event: &DomainEvent) -> Result<DispatchReport, PublishError> {
        let targets = self.targets(event.kind());
        if targets.is_empty() {
            warn!(
                card_id = %event.entity_id(),
                kind = %event.kind(),
                "no synchronizer handles this event"
            );
        }

        let mut delivered = Vec::with_capacity(targets.len());
        let mut failures = Vec::new();
        for synchronizer in targets {
            debug!(
                card_id = %event.entity_id(),
                kind = %event.kind(),
                synchronizer = synchronizer.name(),
                "dispatching event"
            );
            match synchronizer.handle(event).await {
                Ok(()) => delivered.push(synchronizer.name()),
                Err(err) => {
                    error!(
                        card_id = %event.entity_id(),
                        kind = %event.kind(),
                        synchronizer = synchronizer.name(),
                        error = %err,
                        "synchronizer failed"
                    );
                    failures.push(DispatchFailure {
                        name: synchronizer.name(),
                        error: err,
                    });
                }
            }
        }
        PublishError::from_failures(event, delivered, failures)
    }

    /// Subscribed synchronizers accepting `kind`, lowest priority first.
    fn targets(&self, kind: EventKind) -> Vec<Arc<Synchronizer<R, C>>> {
        let mut targets: Vec<_> = self
            .synchronizers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|synchronizer| synchronizer.can_handle(kind))
            .cloned()
            .collect();
        targets.sort_by_key(|synchronizer| synchronizer.priority());
        targets
    }
}

impl<R, C> EventPublisher<R, C>
where
    R: SyncStatusRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Dispatches `event` on a spawned task and returns its handle at once.
    ///
    /// The spawned task delivers to synchronizers in the same order as
    /// [`Self::publish`].
    pub fn publish_async(
        self: &Arc<Self>,
        event: DomainEvent,
    ) -> JoinHandle<Result<DispatchReport, PublishError>> {
        let publisher = Arc::clone(self);
        tokio::spawn(async move { publisher.publish(&event).await })
    }
}
