use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use brewlog_core::config::{API_TOKEN_ENV, API_URL_ENV, TIMEOUT_ENV};
use brewlog_core::db::LibSqlStore;
use brewlog_core::models::{BrewingSession, Tea};
use brewlog_core::sync::{get_offline, OfflineUploadReport, Rejection, SaveOutcome, SyncReport};
use brewlog_core::{Entity, EntityKind, LocalId};
use clap::Parser;
use pretty_assertions::assert_eq;

use crate::cli::{Cli, ClockCommands, Commands, CompletionShell, KindArg};
use crate::commands::add::{run_add_tea, run_start_session};
use crate::commands::common::{
    describe_save, describe_sync, describe_upload, format_countdown, format_entity_lines, kinds,
    normalize_name, open_catalog, resolve_api_config, truncate, validate_duration, Context,
};
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::list::{run_list, run_pending};
use crate::commands::sync::{run_sync, run_upload};
use crate::error::CliError;

fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |name| {
        pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| (*value).to_string())
    }
}

#[test]
fn resolve_api_config_is_none_without_url() {
    let config = resolve_api_config(None, Some(1000), lookup_from(&[])).unwrap();
    assert!(config.is_none());
}

#[test]
fn resolve_api_config_reads_environment() {
    let config = resolve_api_config(
        None,
        None,
        lookup_from(&[
            (API_URL_ENV, "https://tea.example.com/api/"),
            (API_TOKEN_ENV, "secret"),
            (TIMEOUT_ENV, "2500"),
        ]),
    )
    .unwrap()
    .unwrap();

    assert_eq!(config.base_url, "https://tea.example.com/api");
    assert_eq!(config.access_token.as_deref(), Some("secret"));
    assert_eq!(config.timeout(), Duration::from_millis(2500));
}

#[test]
fn resolve_api_config_flags_override_environment() {
    let config = resolve_api_config(
        Some("http://localhost:8000".to_string()),
        Some(750),
        lookup_from(&[
            (API_URL_ENV, "https://ignored.example.com"),
            (TIMEOUT_ENV, "2500"),
        ]),
    )
    .unwrap()
    .unwrap();

    assert_eq!(config.base_url, "http://localhost:8000");
    assert_eq!(config.timeout(), Duration::from_millis(750));
}

#[test]
fn resolve_api_config_rejects_url_without_scheme() {
    let error = resolve_api_config(
        Some("tea.example.com".to_string()),
        None,
        lookup_from(&[]),
    )
    .unwrap_err();
    assert!(matches!(error, CliError::Core(brewlog_core::Error::Config(_))));
}

#[test]
fn kinds_defaults_to_every_collection() {
    assert_eq!(kinds(None), EntityKind::ALL.to_vec());
    assert_eq!(kinds(Some(KindArg::Vendor)), vec![EntityKind::Vendor]);
}

#[test]
fn validate_duration_accepts_api_formats() {
    assert_eq!(validate_duration(" 00:00:20 ").unwrap(), "00:00:20");
    assert_eq!(validate_duration("45").unwrap(), "45");
    assert!(matches!(
        validate_duration("a while"),
        Err(CliError::InvalidDuration(value)) if value == "a while"
    ));
}

#[test]
fn validate_duration_rejects_unrepresentable_values() {
    assert!(matches!(
        validate_duration("9223372036854775807"),
        Err(CliError::InvalidDuration(_))
    ));
    assert!(matches!(
        validate_duration("106751991167301 00:00:00"),
        Err(CliError::InvalidDuration(_))
    ));
}

#[test]
fn format_countdown_units() {
    assert_eq!(format_countdown(0), "done");
    assert_eq!(format_countdown(-500), "done");
    assert_eq!(format_countdown(1), "1s left");
    assert_eq!(format_countdown(20_000), "20s left");
    assert_eq!(format_countdown(125_000), "2m 05s left");
}

#[test]
fn normalize_name_collapses_whitespace() {
    assert_eq!(
        normalize_name("  Da   Hong\tPao "),
        Some("Da Hong Pao".to_string())
    );
    assert_eq!(normalize_name(" \n "), None);
}

#[test]
fn truncate_adds_ellipsis() {
    assert_eq!(truncate("Short", 10), "Short");
    assert_eq!(
        truncate("A very long tea name from Fujian", 12),
        "A very lo..."
    );
}

#[test]
fn format_entity_lines_marks_pending_entries() {
    let mut synced = Tea::new("Longjing", 1);
    synced.set_local_id(LocalId::new(1));
    synced.set_server_id("abcdef0123456789".to_string());
    synced.year = Some(2023);

    let mut pending = Tea::new("Shou Mei", 1);
    pending.set_local_id(LocalId::new(2));

    let lines = format_entity_lines(&[synced, pending]);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("   1  abcdef01"));
    assert!(lines[0].contains("Longjing"));
    assert!(lines[0].ends_with("2023"));
    assert!(lines[1].contains("(pending)"));
    assert!(lines[1].ends_with("Shou Mei"));
}

#[test]
fn describe_save_distinguishes_local_saves() {
    let mut tea = Tea::new("Bai Hao", 1);
    tea.set_local_id(LocalId::new(3));

    let synced = describe_save(&SaveOutcome::Synced(tea.clone()));
    assert_eq!(synced, "Saved tea 3 'Bai Hao'");

    let local = describe_save(&SaveOutcome::SavedLocally {
        entity: tea,
        reason: "timed out".to_string(),
    });
    assert_eq!(
        local,
        "Saved tea 3 'Bai Hao' locally, will sync later (timed out)"
    );
}

#[test]
fn describe_sync_reports_unreachable_server() {
    let report = SyncReport {
        local: 2,
        ..SyncReport::default()
    };
    assert_eq!(
        describe_sync(EntityKind::Tea, &report),
        "tea: server unreachable, showing 2 cached entries"
    );

    let report = SyncReport {
        local: 1,
        remote: Some(4),
        expired_clocks: 1,
        superseded: false,
    };
    assert_eq!(
        describe_sync(EntityKind::Session, &report),
        "session: 4 from server, 1 local, 1 finished clocks"
    );
}

#[test]
fn describe_upload_lists_rejections() {
    let report = OfflineUploadReport {
        uploaded: 2,
        rejected: vec![Rejection {
            local_id: Some(LocalId::new(5)),
            detail: "{\"name\": [\"This field is required.\"]}".to_string(),
        }],
    };
    let line = describe_upload(EntityKind::Vendor, &report);
    assert!(line.starts_with("vendor: uploaded 2, rejected 1 (5: "));
    assert!(line.contains("This field is required."));

    assert_eq!(
        describe_upload(EntityKind::Tea, &OfflineUploadReport::default()),
        "tea: uploaded 0"
    );
}

#[test]
fn cli_parses_plural_kind_aliases() {
    let cli = Cli::try_parse_from(["brewlog", "list", "teas", "--json"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::List {
            kind: KindArg::Tea,
            refresh: false,
            json: true
        }
    ));
}

#[test]
fn cli_parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "brewlog",
        "sync",
        "--api-url",
        "http://localhost:8000",
        "--timeout-ms",
        "900",
    ])
    .unwrap();
    assert!(matches!(cli.command, Commands::Sync { kind: None }));
    assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8000"));
    assert_eq!(cli.timeout_ms, Some(900));
}

#[test]
fn cli_parses_clock_and_delete_ids() {
    let cli = Cli::try_parse_from(["brewlog", "clock", "start", "4"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Clock {
            command: ClockCommands::Start { session }
        } if session == LocalId::new(4)
    ));

    assert!(Cli::try_parse_from(["brewlog", "delete", "tea", "abc"]).is_err());
}

#[test]
fn cli_session_defaults() {
    let cli = Cli::try_parse_from(["brewlog", "start-session"]).unwrap();
    let Commands::StartSession {
        initial,
        increments,
        tea,
        clock,
    } = cli.command
    else {
        panic!("expected start-session");
    };
    assert_eq!(initial, "00:00:20");
    assert_eq!(increments, "00:00:05");
    assert_eq!(tea, None);
    assert!(!clock);
}

#[cfg_attr(windows, ignore = "libsql integration is flaky on windows CI")]
#[tokio::test(flavor = "current_thread")]
async fn run_add_tea_offline_queues_entry() {
    let ctx = offline_context();

    run_add_tea(
        &ctx,
        &["Da".to_string(), "Hong".to_string(), "Pao".to_string()],
        2,
        Some(" Yunnan Sourcing "),
        Some(2021),
    )
    .await
    .unwrap();

    {
        let store = LibSqlStore::open_path(&ctx.db_path).await.unwrap();
        let pending = get_offline::<Tea, _>(&store).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "Da Hong Pao");
        assert_eq!(pending[0].category, 2);
        assert_eq!(pending[0].local_id, Some(LocalId::FIRST));
        assert_eq!(pending[0].server_id, None);
        assert_eq!(
            pending[0].vendor.as_ref().map(|vendor| vendor.name.as_str()),
            Some("Yunnan Sourcing")
        );
    }

    run_pending(&ctx, KindArg::Tea, true).await.unwrap();
    run_list(&ctx, KindArg::Tea, false, false).await.unwrap();

    cleanup_db_files(&ctx.db_path);
}

#[cfg_attr(windows, ignore = "libsql integration is flaky on windows CI")]
#[tokio::test(flavor = "current_thread")]
async fn run_add_tea_rejects_empty_name() {
    let ctx = offline_context();

    let error = run_add_tea(&ctx, &["  ".to_string()], 1, None, None)
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::EmptyName));

    cleanup_db_files(&ctx.db_path);
}

#[cfg_attr(windows, ignore = "libsql integration is flaky on windows CI")]
#[tokio::test(flavor = "current_thread")]
async fn run_add_tea_allocates_fresh_ids_across_runs() {
    let ctx = offline_context();

    run_add_tea(&ctx, &["Longjing".to_string()], 1, None, None)
        .await
        .unwrap();
    run_add_tea(&ctx, &["Tieguanyin".to_string()], 1, None, None)
        .await
        .unwrap();

    {
        let store = LibSqlStore::open_path(&ctx.db_path).await.unwrap();
        let pending = get_offline::<Tea, _>(&store).await.unwrap();
        let ids = pending
            .iter()
            .filter_map(|tea| tea.local_id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![LocalId::new(1), LocalId::new(2)]);
    }

    cleanup_db_files(&ctx.db_path);
}

#[cfg_attr(windows, ignore = "libsql integration is flaky on windows CI")]
#[tokio::test(flavor = "current_thread")]
async fn run_delete_removes_pending_entry() {
    let ctx = offline_context();

    run_add_tea(&ctx, &["Jin Jun Mei".to_string()], 1, None, None)
        .await
        .unwrap();
    run_delete(&ctx, KindArg::Tea, LocalId::FIRST).await.unwrap();

    {
        let store = LibSqlStore::open_path(&ctx.db_path).await.unwrap();
        let pending = get_offline::<Tea, _>(&store).await.unwrap();
        assert!(pending.is_empty());
    }

    let error = run_delete(&ctx, KindArg::Tea, LocalId::FIRST)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        CliError::Core(brewlog_core::Error::NotFound(_))
    ));

    cleanup_db_files(&ctx.db_path);
}

#[cfg_attr(windows, ignore = "libsql integration is flaky on windows CI")]
#[tokio::test(flavor = "current_thread")]
async fn run_start_session_links_tea_and_starts_clock() {
    let ctx = offline_context();

    run_add_tea(&ctx, &["Lapsang Souchong".to_string()], 1, None, None)
        .await
        .unwrap();
    run_start_session(&ctx, "00:00:30", "10", Some("lapsang souchong"), true)
        .await
        .unwrap();

    {
        let catalog = open_catalog(&ctx).await.unwrap();
        let store = catalog.store();
        let sessions = get_offline::<BrewingSession, _>(store).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].name.as_deref(), Some("Lapsang Souchong"));
        assert_eq!(sessions[0].brewing.initial.as_deref(), Some("00:00:30"));

        let clocks = catalog.clocks().await.unwrap();
        assert_eq!(clocks.len(), 1);
        assert_eq!(clocks[0].local_id, LocalId::FIRST);
    }

    cleanup_db_files(&ctx.db_path);
}

#[cfg_attr(windows, ignore = "libsql integration is flaky on windows CI")]
#[tokio::test(flavor = "current_thread")]
async fn run_start_session_requires_known_tea() {
    let ctx = offline_context();

    let error = run_start_session(&ctx, "20", "5", Some("Unknown"), false)
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::TeaNotFound(name) if name == "Unknown"));

    let error = run_start_session(&ctx, "soon", "5", None, false)
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::InvalidDuration(_)));

    cleanup_db_files(&ctx.db_path);
}

#[cfg_attr(windows, ignore = "libsql integration is flaky on windows CI")]
#[tokio::test(flavor = "current_thread")]
async fn run_sync_without_api_keeps_entries_pending() {
    let ctx = offline_context();

    run_add_tea(&ctx, &["Oriental Beauty".to_string()], 1, None, None)
        .await
        .unwrap();
    run_sync(&ctx, None).await.unwrap();
    run_sync(&ctx, Some(KindArg::Tea)).await.unwrap();
    run_upload(&ctx, None).await.unwrap();

    {
        let store = LibSqlStore::open_path(&ctx.db_path).await.unwrap();
        let pending = get_offline::<Tea, _>(&store).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "Oriental Beauty");
    }

    cleanup_db_files(&ctx.db_path);
}

#[test]
fn run_completions_writes_bash_script_file() {
    let output_path = std::env::temp_dir().join(format!(
        "brewlog-completions-test-{}.bash",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_nanos())
    ));

    run_completions(CompletionShell::Bash, Some(&output_path)).unwrap();

    let script = std::fs::read_to_string(&output_path).unwrap();
    assert!(script.contains("_brewlog()"));
    assert!(script.contains("complete -F _brewlog"));

    let _ = std::fs::remove_file(output_path);
}

#[test]
fn run_completions_covers_subcommands_for_fish() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("brewlog.fish");

    run_completions(CompletionShell::Fish, Some(&output_path)).unwrap();

    let script = std::fs::read_to_string(&output_path).unwrap();
    assert!(script.contains("complete -c brewlog"));
    assert!(script.contains("start-session"));
    assert!(script.contains("pending"));
}

fn offline_context() -> Context {
    Context {
        db_path: unique_test_db_path(),
        api: None,
    }
}

fn unique_test_db_path() -> PathBuf {
    static NEXT_TEST_DB_ID: AtomicU64 = AtomicU64::new(0);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    let sequence = NEXT_TEST_DB_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("brewlog-cli-test-{timestamp}-{sequence}.db"))
}

fn cleanup_db_files(path: &PathBuf) {
    // libsql can keep file handles alive briefly after drop on Windows.
    if cfg!(windows) {
        return;
    }

    let _ = std::fs::remove_file(path);
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
}
