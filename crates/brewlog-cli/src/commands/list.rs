use brewlog_core::models::{BrewingSession, Subcategory, Tea, Vendor};
use brewlog_core::sync::{get_offline, Collection};
use brewlog_core::EntityKind;

use crate::cli::KindArg;
use crate::commands::common::{open_catalog, print_entities, Catalog, Context, Listing};
use crate::error::CliError;

pub async fn run_list(
    ctx: &Context,
    kind: KindArg,
    refresh: bool,
    as_json: bool,
) -> Result<(), CliError> {
    let catalog = open_catalog(ctx).await?;
    match EntityKind::from(kind) {
        EntityKind::Tea => show(&catalog, catalog.teas(), refresh, as_json).await,
        EntityKind::Session => show(&catalog, catalog.sessions(), refresh, as_json).await,
        EntityKind::Vendor => show(&catalog, catalog.vendors(), refresh, as_json).await,
        EntityKind::Subcategory => {
            show(&catalog, catalog.subcategories(), refresh, as_json).await
        }
    }
}

async fn show<E: Listing>(
    catalog: &Catalog,
    collection: &Collection<E>,
    refresh: bool,
    as_json: bool,
) -> Result<(), CliError> {
    if refresh {
        let report = catalog.sync(E::KIND).await?;
        if !report.reached_server() {
            eprintln!("Server unreachable, showing local state");
        }
    } else {
        catalog.load_local(E::KIND).await?;
    }
    print_entities(&collection.snapshot(), as_json)
}

pub async fn run_pending(ctx: &Context, kind: KindArg, as_json: bool) -> Result<(), CliError> {
    let catalog = open_catalog(ctx).await?;
    match EntityKind::from(kind) {
        EntityKind::Tea => pending::<Tea>(&catalog, as_json).await,
        EntityKind::Session => pending::<BrewingSession>(&catalog, as_json).await,
        EntityKind::Vendor => pending::<Vendor>(&catalog, as_json).await,
        EntityKind::Subcategory => pending::<Subcategory>(&catalog, as_json).await,
    }
}

async fn pending<E: Listing>(catalog: &Catalog, as_json: bool) -> Result<(), CliError> {
    let pending = get_offline::<E, _>(catalog.store()).await?;
    print_entities(&pending, as_json)
}
