use brewlog_core::models::{Brewing, BrewingSession, Tea, Vendor};
use brewlog_core::EntityKind;

use crate::commands::common::{describe_save, normalize_name, open_catalog, validate_duration, Context};
use crate::error::CliError;

pub async fn run_add_tea(
    ctx: &Context,
    name_parts: &[String],
    category: u32,
    vendor: Option<&str>,
    year: Option<i32>,
) -> Result<(), CliError> {
    let name = normalize_name(&name_parts.join(" ")).ok_or(CliError::EmptyName)?;

    let catalog = open_catalog(ctx).await?;
    catalog.load_local(EntityKind::Tea).await?;

    let mut tea = Tea::new(name, category);
    tea.vendor = vendor.and_then(normalize_name).map(Vendor::new);
    tea.year = year;

    let outcome = catalog.save_tea(tea, None).await?;
    println!("{}", describe_save(&outcome));
    Ok(())
}

pub async fn run_start_session(
    ctx: &Context,
    initial: &str,
    increments: &str,
    tea_name: Option<&str>,
    start_clock: bool,
) -> Result<(), CliError> {
    let brewing = Brewing::timed(validate_duration(initial)?, validate_duration(increments)?);
    let mut session = BrewingSession::new(brewing);

    let catalog = open_catalog(ctx).await?;
    catalog.load_local(EntityKind::Session).await?;

    if let Some(tea_name) = tea_name {
        catalog.load_local(EntityKind::Tea).await?;
        let wanted = tea_name.trim();
        let tea = catalog
            .teas()
            .snapshot()
            .into_iter()
            .find(|tea| tea.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CliError::TeaNotFound(wanted.to_string()))?;
        session.tea = tea.server_id;
        session.name = Some(tea.name);
    }

    let outcome = catalog.save_session(session, None).await?;
    println!("{}", describe_save(&outcome));

    if start_clock {
        if let Some(local_id) = outcome.entity().local_id {
            catalog.start_clock(local_id).await?;
            println!("Clock started for session {local_id}");
        }
    }
    Ok(())
}
