use brewlog_core::{EntityKind, Error};

use crate::cli::KindArg;
use crate::commands::common::{describe_sync, describe_upload, kinds, open_catalog, Catalog, Context};
use crate::error::CliError;

pub async fn run_sync(ctx: &Context, kind: Option<KindArg>) -> Result<(), CliError> {
    let catalog = open_catalog(ctx).await?;

    let Some(kind) = kind else {
        let report = catalog.sync_all().await;
        for (kind, synced) in &report.synced {
            println!("{}", describe_sync(*kind, synced));
        }
        for (kind, pending) in &report.still_pending {
            println!("{kind}: {pending} entries still pending");
        }
        for (kind, rejection) in &report.rejected {
            println!(
                "{kind}: entry {} rejected: {}",
                rejection
                    .local_id
                    .map_or_else(|| "-".to_string(), |id| id.to_string()),
                rejection.detail
            );
        }
        for (kind, failure) in &report.failures {
            eprintln!("{kind}: {failure}");
        }
        println!("Sync state: {}", report.state());
        return Ok(());
    };

    let kind = EntityKind::from(kind);
    upload_kind(&catalog, kind).await?;
    let report = catalog.sync(kind).await?;
    println!("{}", describe_sync(kind, &report));
    Ok(())
}

pub async fn run_upload(ctx: &Context, kind: Option<KindArg>) -> Result<(), CliError> {
    let catalog = open_catalog(ctx).await?;
    for kind in kinds(kind) {
        upload_kind(&catalog, kind).await?;
    }
    Ok(())
}

async fn upload_kind(catalog: &Catalog, kind: EntityKind) -> Result<(), CliError> {
    match catalog.upload(kind).await {
        Ok(report) => println!("{}", describe_upload(kind, &report)),
        Err(Error::UploadIncomplete {
            pending, reason, ..
        }) => println!("{kind}: {pending} entries still pending ({reason})"),
        Err(error) => return Err(error.into()),
    }
    Ok(())
}
