//! Shared world state for synchronization status BDD scenarios.

use std::sync::Arc;

use card_sync::{
    card::CardId,
    sync_status::{
        adapters::memory::InMemorySyncStatusRepository,
        domain::{IntegrationSyncStatus, IntegrationType},
        services::SyncStatusService,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestStatusService = SyncStatusService<InMemorySyncStatusRepository, DefaultClock>;

/// Scenario world for synchronization status behaviour tests.
pub struct SyncStatusWorld {
    pub service: TestStatusService,
    pub tracked: Option<(CardId, IntegrationType)>,
    pub last_retry_granted: Option<bool>,
    pub last_lookup: Option<Option<IntegrationSyncStatus>>,
}

impl SyncStatusWorld {
    /// Creates a world with no tracked card.
    #[must_use]
    pub fn new() -> Self {
        let service = SyncStatusService::new(
            Arc::new(InMemorySyncStatusRepository::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            tracked: None,
            last_retry_granted: None,
            last_lookup: None,
        }
    }

    /// Returns the tracked card and integration.
    ///
    /// # Errors
    ///
    /// Returns an error when no card has been tracked yet.
    pub fn tracked_pair(&self) -> Result<(CardId, IntegrationType), eyre::Report> {
        self.tracked
            .ok_or_else(|| eyre::eyre!("missing tracked card in scenario world"))
    }
}

impl Default for SyncStatusWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SyncStatusWorld {
    SyncStatusWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Spends `times` retries from the tracked row's budget.
///
/// # Errors
///
/// Returns an error when no card is tracked or the service fails.
pub fn request_retries(world: &mut SyncStatusWorld, times: u32) -> Result<(), eyre::Report> {
    let (entity_id, integration_type) = world.tracked_pair()?;
    for _ in 0..times {
        let granted = run_async(world.service.mark_for_retry(entity_id, integration_type))
            .map_err(|err| eyre::eyre!("request retry: {err}"))?;
        world.last_retry_granted = Some(granted);
    }
    Ok(())
}

/// Parses a card identifier from scenario text.
///
/// # Errors
///
/// Returns an error for non-positive identifiers.
pub fn card_id(value: i64) -> Result<CardId, eyre::Report> {
    CardId::new(value).map_err(|err| eyre::eyre!("invalid card id in scenario: {err}"))
}

/// Parses an integration type storage name from scenario text.
///
/// # Errors
///
/// Returns an error for unknown names.
pub fn integration(name: &str) -> Result<IntegrationType, eyre::Report> {
    IntegrationType::try_from(name)
        .map_err(|err| eyre::eyre!("invalid integration type in scenario: {err}"))
}
