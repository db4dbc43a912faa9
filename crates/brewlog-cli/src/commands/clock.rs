use brewlog_core::util::unix_millis_now;
use brewlog_core::{Entity, EntityKind, LocalId};
use serde::Serialize;

use crate::commands::common::{format_countdown, open_catalog, Context};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct ClockItem {
    pub session: LocalId,
    pub starting_time: i64,
    pub ends_at: Option<i64>,
    pub remaining: String,
}

pub async fn run_clock_start(ctx: &Context, session: LocalId) -> Result<(), CliError> {
    let catalog = open_catalog(ctx).await?;
    catalog.load_local(EntityKind::Session).await?;

    let clock = catalog.start_clock(session).await?;
    let countdown = catalog
        .sessions()
        .find(session)
        .and_then(|session| session.infusion_countdown());
    match countdown {
        Some(countdown) => println!(
            "Clock started for session {session}, {}",
            format_countdown(clock.ends_at(countdown) - clock.starting_time)
        ),
        None => println!("Clock started for session {session} (no brewing time set)"),
    }
    Ok(())
}

pub async fn run_clock_cancel(ctx: &Context, session: LocalId) -> Result<(), CliError> {
    let catalog = open_catalog(ctx).await?;
    if catalog.cancel_clock(session).await? {
        println!("Clock cancelled for session {session}");
    } else {
        println!("No clock running for session {session}");
    }
    Ok(())
}

pub async fn run_clock_list(ctx: &Context, as_json: bool) -> Result<(), CliError> {
    let catalog = open_catalog(ctx).await?;
    catalog.load_local(EntityKind::Session).await?;
    let now_ms = unix_millis_now();

    let items = catalog
        .clocks()
        .await?
        .into_iter()
        .map(|clock| {
            let ends_at = catalog
                .sessions()
                .find(clock.local_id)
                .and_then(|session| session.infusion_countdown())
                .map(|countdown| clock.ends_at(countdown));
            ClockItem {
                session: clock.local_id,
                starting_time: clock.starting_time,
                ends_at,
                remaining: ends_at.map_or_else(
                    || "unknown".to_string(),
                    |ends_at| format_countdown(ends_at - now_ms),
                ),
            }
        })
        .collect::<Vec<_>>();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("No clocks running.");
    } else {
        for item in &items {
            println!("{:>4}  {}", item.session, item.remaining);
        }
    }
    Ok(())
}
