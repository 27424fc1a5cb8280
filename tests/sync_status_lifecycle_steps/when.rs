//! When steps for synchronization status BDD scenarios.

use super::world::{SyncStatusWorld, card_id, integration, request_retries, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"card {entity:i64} is tracked again for "{integration_name}""#)]
fn card_is_tracked_again(
    world: &mut SyncStatusWorld,
    entity: i64,
    integration_name: String,
) -> Result<(), eyre::Report> {
    let entity_id = card_id(entity)?;
    let integration_type = integration(&integration_name)?;
    run_async(
        world
            .service
            .create_status(entity_id, integration_type, Some(9)),
    )
    .wrap_err("create sync status a second time")?;
    Ok(())
}

#[when(r#"the card is marked synced with external id "{external_id}""#)]
fn card_marked_synced(world: &mut SyncStatusWorld, external_id: String) -> Result<(), eyre::Report> {
    let (entity_id, integration_type) = world.tracked_pair()?;
    run_async(
        world
            .service
            .mark_synced(entity_id, integration_type, &external_id),
    )
    .wrap_err("mark sync status synced")?
    .ok_or_else(|| eyre::eyre!("tracked row disappeared"))?;
    Ok(())
}

#[when("a retry is requested {times:u32} times")]
fn retry_requested(world: &mut SyncStatusWorld, times: u32) -> Result<(), eyre::Report> {
    request_retries(world, times)
}

#[when("the retry budget is reset")]
fn retry_budget_reset(world: &mut SyncStatusWorld) -> Result<(), eyre::Report> {
    let (entity_id, integration_type) = world.tracked_pair()?;
    run_async(world.service.reset_retries(entity_id, integration_type))
        .wrap_err("reset retry budget")?
        .ok_or_else(|| eyre::eyre!("tracked row disappeared"))?;
    Ok(())
}

#[when(r#"the status of card {entity:i64} for "{integration_name}" is looked up"#)]
fn status_looked_up(
    world: &mut SyncStatusWorld,
    entity: i64,
    integration_name: String,
) -> Result<(), eyre::Report> {
    let entity_id = card_id(entity)?;
    let integration_type = integration(&integration_name)?;
    let found = run_async(world.service.status(entity_id, integration_type))
        .wrap_err("look up sync status")?;
    world.last_lookup = Some(found);
    Ok(())
}
