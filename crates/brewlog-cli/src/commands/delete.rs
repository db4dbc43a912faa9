use brewlog_core::{EntityKind, LocalId};

use crate::cli::KindArg;
use crate::commands::common::{open_catalog, Context};
use crate::error::CliError;

pub async fn run_delete(ctx: &Context, kind: KindArg, local_id: LocalId) -> Result<(), CliError> {
    let kind = EntityKind::from(kind);
    let catalog = open_catalog(ctx).await?;
    catalog.load_local(kind).await?;

    catalog.delete(kind, local_id).await?;
    println!("{local_id}");
    Ok(())
}
