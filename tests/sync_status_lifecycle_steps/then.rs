//! Then steps for synchronization status BDD scenarios.

use super::world::{SyncStatusWorld, card_id, run_async};
use card_sync::sync_status::domain::{IntegrationSyncStatus, SyncStatus};
use eyre::WrapErr;
use rstest_bdd_macros::then;

fn current(world: &SyncStatusWorld) -> Result<IntegrationSyncStatus, eyre::Report> {
    let (entity_id, integration_type) = world.tracked_pair()?;
    run_async(world.service.status(entity_id, integration_type))
        .wrap_err("load tracked sync status")?
        .ok_or_else(|| eyre::eyre!("tracked row is missing"))
}

#[then(r#"the status is "{expected}""#)]
fn status_is(world: &SyncStatusWorld, expected: String) -> Result<(), eyre::Report> {
    let expected_status = SyncStatus::try_from(expected.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let status = current(world)?;

    if status.status() != expected_status {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected_status.as_str(),
            status.status().as_str()
        ));
    }

    Ok(())
}

#[then("the retry count is {expected:u32}")]
fn retry_count_is(world: &SyncStatusWorld, expected: u32) -> Result<(), eyre::Report> {
    let status = current(world)?;
    if status.retry_count() != expected {
        return Err(eyre::eyre!(
            "expected retry count {expected}, found {}",
            status.retry_count()
        ));
    }
    Ok(())
}

#[then("no error is recorded")]
fn no_error_recorded(world: &SyncStatusWorld) -> Result<(), eyre::Report> {
    let status = current(world)?;
    if let Some(message) = status.error_message() {
        return Err(eyre::eyre!("expected no error, found {message:?}"));
    }
    Ok(())
}

#[then(r#"the external id is "{expected}""#)]
fn external_id_is(world: &SyncStatusWorld, expected: String) -> Result<(), eyre::Report> {
    let status = current(world)?;
    if status.external_id() != Some(expected.as_str()) {
        return Err(eyre::eyre!(
            "expected external id {expected:?}, found {:?}",
            status.external_id()
        ));
    }
    Ok(())
}

#[then("the last retry request was refused")]
fn last_retry_refused(world: &SyncStatusWorld) -> Result<(), eyre::Report> {
    match world.last_retry_granted {
        Some(false) => Ok(()),
        other => Err(eyre::eyre!("expected a refused retry, got {other:?}")),
    }
}

#[then("card {entity:i64} has {expected:u32} status row")]
fn card_has_rows(world: &SyncStatusWorld, entity: i64, expected: u32) -> Result<(), eyre::Report> {
    let entity_id = card_id(entity)?;
    let rows = run_async(world.service.statuses_for_entity(entity_id))
        .wrap_err("load status rows for card")?;
    if u32::try_from(rows.len()).ok() != Some(expected) {
        return Err(eyre::eyre!("expected {expected} row(s), found {}", rows.len()));
    }
    Ok(())
}

#[then("no status is found")]
fn no_status_found(world: &SyncStatusWorld) -> Result<(), eyre::Report> {
    match &world.last_lookup {
        Some(None) => Ok(()),
        other => Err(eyre::eyre!("expected an empty lookup, got {other:?}")),
    }
}
