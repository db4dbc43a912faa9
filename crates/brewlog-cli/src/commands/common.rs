use std::env;
use std::path::{Path, PathBuf};

use brewlog_core::config::{ApiConfig, API_URL_ENV, TIMEOUT_ENV};
use brewlog_core::db::LibSqlStore;
use brewlog_core::gateway::{GatewayError, GatewayResponse, HttpGateway, Method, RemoteGateway};
use brewlog_core::models::{parse_duration_seconds, BrewingSession, Subcategory, Tea, Vendor};
use brewlog_core::sync::{OfflineUploadReport, SaveOutcome, SyncReport};
use brewlog_core::util::{collapse_whitespace, normalize_text_option};
use brewlog_core::{CatalogService, Entity, EntityKind};

use crate::cli::KindArg;
use crate::error::CliError;

pub type Catalog = CatalogService<LibSqlStore, CliGateway>;

/// Gateway used by the CLI: HTTP when an API URL is configured, offline otherwise.
pub enum CliGateway {
    Http(HttpGateway),
    Offline,
}

impl RemoteGateway for CliGateway {
    async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<String>,
    ) -> Result<GatewayResponse, GatewayError> {
        match self {
            Self::Http(gateway) => gateway.request(endpoint, method, body).await,
            Self::Offline => Err(GatewayError::Unreachable(format!(
                "no API URL configured (set {API_URL_ENV} or pass --api-url)"
            ))),
        }
    }
}

/// Resolved settings shared by every command.
pub struct Context {
    pub db_path: PathBuf,
    pub api: Option<ApiConfig>,
}

impl Context {
    pub fn resolve(
        db_path: Option<PathBuf>,
        api_url: Option<String>,
        timeout_ms: Option<u64>,
    ) -> Result<Self, CliError> {
        Ok(Self {
            db_path: resolve_db_path(db_path)?,
            api: resolve_api_config(api_url, timeout_ms, |name| env::var(name).ok())?,
        })
    }
}

/// API settings from flags layered over the environment, `None` when no URL is known.
pub fn resolve_api_config(
    api_url: Option<String>,
    timeout_ms: Option<u64>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<ApiConfig>, CliError> {
    let layered = |name: &str| match name {
        API_URL_ENV => api_url.clone().or_else(|| lookup(name)),
        TIMEOUT_ENV => timeout_ms.map(|ms| ms.to_string()).or_else(|| lookup(name)),
        _ => lookup(name),
    };
    if normalize_text_option(layered(API_URL_ENV)).is_none() {
        return Ok(None);
    }
    Ok(Some(ApiConfig::from_lookup(layered)?))
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match cli_db_path.or_else(|| env::var_os("BREWLOG_DB_PATH").map(PathBuf::from)) {
        Some(path) => Ok(path),
        None => default_db_path(),
    }
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("brewlog").join("brewlog.db"))
        .ok_or(CliError::NoDataDir)
}

pub async fn open_store(path: &Path) -> Result<LibSqlStore, CliError> {
    Ok(LibSqlStore::open_path(path).await?)
}

pub async fn open_catalog(ctx: &Context) -> Result<Catalog, CliError> {
    let store = open_store(&ctx.db_path).await?;
    let gateway = match &ctx.api {
        Some(config) => CliGateway::Http(HttpGateway::new(config)?),
        None => {
            tracing::info!("No API URL configured, working offline");
            CliGateway::Offline
        }
    };
    Ok(CatalogService::new(store, gateway))
}

pub fn kinds(kind: Option<KindArg>) -> Vec<EntityKind> {
    kind.map_or_else(|| EntityKind::ALL.to_vec(), |kind| vec![kind.into()])
}

/// Human-readable summary of a catalogue entry.
pub trait Listing: Entity {
    fn title(&self) -> String;

    fn detail(&self) -> String {
        String::new()
    }
}

impl Listing for Tea {
    fn title(&self) -> String {
        self.name.clone()
    }

    fn detail(&self) -> String {
        let mut parts = Vec::new();
        if let Some(vendor) = &self.vendor {
            parts.push(vendor.name.clone());
        }
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        if self.is_archived {
            parts.push("archived".to_string());
        }
        parts.join(", ")
    }
}

impl Listing for BrewingSession {
    fn title(&self) -> String {
        self.name.clone().unwrap_or_else(|| "Session".to_string())
    }

    fn detail(&self) -> String {
        if self.is_completed {
            "completed".to_string()
        } else {
            format!("infusion {}", self.current_infusion)
        }
    }
}

impl Listing for Vendor {
    fn title(&self) -> String {
        self.name.clone()
    }

    fn detail(&self) -> String {
        self.website.clone().unwrap_or_default()
    }
}

impl Listing for Subcategory {
    fn title(&self) -> String {
        self.name.clone()
    }

    fn detail(&self) -> String {
        self.translated_name.clone().unwrap_or_default()
    }
}

pub fn format_entity_lines<E: Listing>(items: &[E]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            let local_id = item
                .local_id()
                .map_or_else(|| "-".to_string(), |id| id.to_string());
            let server_id = item.server_id().map_or_else(
                || "(pending)".to_string(),
                |id| id.chars().take(8).collect::<String>(),
            );
            let title = truncate(&item.title(), 40);
            let detail = item.detail();

            if detail.is_empty() {
                format!("{local_id:>4}  {server_id:<9}  {title}")
            } else {
                format!("{local_id:>4}  {server_id:<9}  {title:<40}  {detail}")
            }
        })
        .collect()
}

pub fn print_entities<E: Listing>(items: &[E], as_json: bool) -> Result<(), CliError> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else if items.is_empty() {
        println!("No entries.");
    } else {
        for line in format_entity_lines(items) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    let collapsed = collapse_whitespace(text).unwrap_or_default();
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let mut truncated = collapsed
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn normalize_name(value: &str) -> Option<String> {
    collapse_whitespace(value)
}

pub fn validate_duration(value: &str) -> Result<String, CliError> {
    let trimmed = value.trim();
    parse_duration_seconds(trimmed)
        .map(|_| trimmed.to_string())
        .ok_or_else(|| CliError::InvalidDuration(value.to_string()))
}

pub fn describe_save<E: Listing>(outcome: &SaveOutcome<E>) -> String {
    let entity = outcome.entity();
    let local_id = entity
        .local_id()
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    match outcome {
        SaveOutcome::Synced(_) => format!(
            "Saved {} {local_id} '{}'",
            E::KIND,
            entity.title()
        ),
        SaveOutcome::SavedLocally { reason, .. } => format!(
            "Saved {} {local_id} '{}' locally, will sync later ({reason})",
            E::KIND,
            entity.title()
        ),
    }
}

pub fn describe_sync(kind: EntityKind, report: &SyncReport) -> String {
    let mut line = match report.remote {
        Some(remote) => format!("{kind}: {remote} from server, {} local", report.local),
        None => format!(
            "{kind}: server unreachable, showing {} cached entries",
            report.local
        ),
    };
    if report.expired_clocks > 0 {
        line.push_str(&format!(", {} finished clocks", report.expired_clocks));
    }
    line
}

pub fn describe_upload(kind: EntityKind, report: &OfflineUploadReport) -> String {
    if report.rejected.is_empty() {
        format!("{kind}: uploaded {}", report.uploaded)
    } else {
        let details = report
            .rejected
            .iter()
            .map(|rejection| {
                let local_id = rejection
                    .local_id
                    .map_or_else(|| "-".to_string(), |id| id.to_string());
                format!("{local_id}: {}", truncate(&rejection.detail, 80))
            })
            .collect::<Vec<_>>()
            .join("; ");
        format!(
            "{kind}: uploaded {}, rejected {} ({details})",
            report.uploaded,
            report.rejected.len()
        )
    }
}

pub fn format_countdown(remaining_ms: i64) -> String {
    if remaining_ms <= 0 {
        return "done".to_string();
    }
    let seconds = (remaining_ms + 999) / 1000;
    if seconds < 60 {
        format!("{seconds}s left")
    } else {
        format!("{}m {:02}s left", seconds / 60, seconds % 60)
    }
}
