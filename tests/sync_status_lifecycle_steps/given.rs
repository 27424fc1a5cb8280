//! Given steps for synchronization status BDD scenarios.

use super::world::{SyncStatusWorld, card_id, integration, request_retries, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"card {entity:i64} is tracked for "{integration_name}""#)]
fn card_is_tracked(
    world: &mut SyncStatusWorld,
    entity: i64,
    integration_name: String,
) -> Result<(), eyre::Report> {
    track(world, entity, &integration_name, None)
}

#[given(r#"card {entity:i64} is tracked for "{integration_name}" with a retry budget of {budget:u32}"#)]
fn card_is_tracked_with_budget(
    world: &mut SyncStatusWorld,
    entity: i64,
    integration_name: String,
    budget: u32,
) -> Result<(), eyre::Report> {
    track(world, entity, &integration_name, Some(budget))
}

#[given(r#"the last attempt failed with "{message}""#)]
fn last_attempt_failed(world: &mut SyncStatusWorld, message: String) -> Result<(), eyre::Report> {
    let (entity_id, integration_type) = world.tracked_pair()?;
    run_async(
        world
            .service
            .mark_error(entity_id, integration_type, &message),
    )
    .wrap_err("record failed attempt")?
    .ok_or_else(|| eyre::eyre!("tracked row disappeared"))?;
    Ok(())
}

#[given("a retry is requested {times:u32} times")]
fn retry_already_requested(world: &mut SyncStatusWorld, times: u32) -> Result<(), eyre::Report> {
    request_retries(world, times)
}

fn track(
    world: &mut SyncStatusWorld,
    entity: i64,
    integration_name: &str,
    budget: Option<u32>,
) -> Result<(), eyre::Report> {
    let entity_id = card_id(entity)?;
    let integration_type = integration(integration_name)?;
    run_async(
        world
            .service
            .create_status(entity_id, integration_type, budget),
    )
    .wrap_err("create sync status for scenario")?;
    world.tracked = Some((entity_id, integration_type));
    Ok(())
}
