use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use colorcodex_core::remote::{MemoryRemoteStore, RemoteError, RemoteKey, RemoteStore};
use colorcodex_core::sync::SyncFailure;
use colorcodex_core::{
    ColorFilter, ColorId, ColorRecord, ColorStore, NewColor, SyncCoordinator, SyncReport,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use tokio::task::JoinSet;

use crate::cli::CompletionShell;
use crate::commands::add::run_add;
use crate::commands::common::{
    color_to_list_item, format_color_lines, format_relative_time, format_snapshot_header,
    format_sync_report_lines, format_timestamp, normalize_color_code, resolve_db_path,
};
use crate::commands::completions::{completion_script, run_completions};
use crate::commands::list::filter_for;
use crate::commands::session::{
    drain_sync_passes, next_sync_lines, parse_session_command, SessionCommand, SyncPass,
};
use crate::error::CliError;

fn color(id: i64, code: &str, synced: bool) -> ColorRecord {
    ColorRecord {
        id: ColorId::new(id),
        color_code: code.to_string(),
        created_at: 0,
        synced,
    }
}

#[test]
fn normalize_color_code_accepts_common_spellings() {
    assert_eq!(normalize_color_code("#a1b2c3").unwrap(), "#A1B2C3");
    assert_eq!(normalize_color_code("  A1B2C3 ").unwrap(), "#A1B2C3");
}

#[test]
fn normalize_color_code_rejects_invalid_values() {
    for raw in ["", "#FFF", "red", "#12345G", "##A1B2C3"] {
        assert!(
            matches!(normalize_color_code(raw), Err(CliError::InvalidColorCode(_))),
            "{raw:?} should be rejected"
        );
    }
}

#[test]
fn resolve_db_path_prefers_explicit_flag() {
    let path = PathBuf::from("/tmp/custom.db");
    assert_eq!(resolve_db_path(Some(path.clone())).unwrap(), path);
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
}

#[test]
fn format_relative_time_long_spans() {
    let day = 24 * 60 * 60_000;
    let now = 1_000 * day;
    assert_eq!(format_relative_time(now - 3 * day, now), "3d ago");
    assert_eq!(format_relative_time(now - 14 * day, now), "2w ago");
    assert_eq!(format_relative_time(now - 60 * day, now), "2mo ago");
    assert_eq!(format_relative_time(now - 800 * day, now), "2y ago");
    assert_eq!(format_relative_time(now + day, now), "just now");
}

#[test]
fn format_snapshot_header_counts_pending() {
    let colors = [
        color(1, "#000001", true),
        color(2, "#000002", false),
        color(3, "#000003", false),
    ];
    assert_eq!(format_snapshot_header(&colors), "--- 3 colors, 2 pending ---");
    assert_eq!(format_snapshot_header(&[]), "--- 0 colors, 0 pending ---");
}

#[test]
fn format_timestamp_returns_utc_label() {
    assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
}

#[test]
fn format_color_lines_show_sync_status() {
    let lines = format_color_lines(&[color(1, "#A1B2C3", false), color(2, "#000000", true)]);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("#A1B2C3"));
    assert!(lines[0].contains("pending"));
    assert!(lines[1].contains("synced"));
}

#[test]
fn color_to_list_item_copies_fields() {
    let item = color_to_list_item(&color(7, "#ABCDEF", true));
    assert_eq!(item.id, 7);
    assert_eq!(item.color_code, "#ABCDEF");
    assert_eq!(item.created_at_iso, "1970-01-01 00:00:00 UTC");
    assert!(item.synced);
}

#[test]
fn filter_for_maps_flag() {
    assert_eq!(filter_for(true), ColorFilter::Unsynced);
    assert_eq!(filter_for(false), ColorFilter::All);
}

#[test]
fn parse_session_command_variants() {
    assert_eq!(parse_session_command("   ").unwrap(), None);
    assert_eq!(
        parse_session_command("add").unwrap(),
        Some(SessionCommand::Add(None))
    );
    assert_eq!(
        parse_session_command("a a1b2c3").unwrap(),
        Some(SessionCommand::Add(Some("#A1B2C3".to_string())))
    );
    assert_eq!(
        parse_session_command("SYNC").unwrap(),
        Some(SessionCommand::Sync)
    );
    assert_eq!(
        parse_session_command("status").unwrap(),
        Some(SessionCommand::Status)
    );
    assert_eq!(
        parse_session_command("quit").unwrap(),
        Some(SessionCommand::Quit)
    );
    assert_eq!(
        parse_session_command("what").unwrap(),
        Some(SessionCommand::Help)
    );
    assert!(parse_session_command("add nope").is_err());
}

#[test]
fn format_sync_report_lines_empty_pass() {
    let lines = format_sync_report_lines(&SyncReport::default());
    assert_eq!(lines, vec!["Nothing to sync".to_string()]);
}

#[test]
fn format_sync_report_lines_list_failures() {
    let report = SyncReport {
        attempted: 3,
        synced: vec![ColorId::new(1), ColorId::new(3)],
        remote_failures: vec![SyncFailure {
            id: ColorId::new(2),
            color_code: "#000002".to_string(),
            message: "offline".to_string(),
        }],
        ..SyncReport::default()
    };

    let lines = format_sync_report_lines(&report);
    assert_eq!(lines[0], "Pushed 2 of 3 colors");
    assert!(lines[1].contains("#000002"));
    assert!(lines[1].contains("offline"));
}

#[test]
fn completions_write_to_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("colorcodex.bash");

    run_completions(CompletionShell::Bash, Some(&output)).unwrap();

    let script = std::fs::read_to_string(&output).unwrap();
    assert!(script.contains("colorcodex"));
}

#[test]
fn completion_scripts_cover_subcommands() {
    for shell in [CompletionShell::Bash, CompletionShell::Zsh, CompletionShell::Fish] {
        let script = String::from_utf8(completion_script(shell)).unwrap();
        assert!(script.contains("session"), "{shell:?} script lacks subcommands");
        assert!(script.contains("sync"));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn add_stores_normalized_color() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("colors.db");

    run_add(Some("a1b2c3"), Some(1000), None, &db_path)
        .await
        .unwrap();
    run_add(None, None, None, &db_path).await.unwrap();

    let store = ColorStore::open(&db_path).await.unwrap();
    let colors = store.list_all().await.unwrap();
    assert_eq!(colors.len(), 2);
    assert_eq!(colors[0].color_code, "#A1B2C3");
    assert_eq!(colors[0].created_at, 1000);
    assert!(colors.iter().all(|color| !color.synced));
}

#[tokio::test(flavor = "multi_thread")]
async fn add_with_existing_id_is_ignored() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("colors.db");

    run_add(Some("#111111"), Some(1), Some(5), &db_path)
        .await
        .unwrap();
    run_add(Some("#222222"), Some(2), Some(5), &db_path)
        .await
        .unwrap();

    let store = ColorStore::open(&db_path).await.unwrap();
    let colors = store.list_all().await.unwrap();
    assert_eq!(colors.len(), 1);
    assert_eq!(colors[0].color_code, "#111111");
}

#[tokio::test(flavor = "multi_thread")]
async fn add_rejects_invalid_code_before_opening_store() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("colors.db");

    let result = run_add(Some("teal"), None, None, &db_path).await;
    assert!(matches!(result, Err(CliError::InvalidColorCode(_))));
    assert!(!db_path.exists());
}

/// Accepts pushes only after a delay, like a slow network.
struct SlowRemote {
    delay: Duration,
    inner: MemoryRemoteStore,
}

impl RemoteStore for SlowRemote {
    async fn append(
        &self,
        collection: &str,
        color: &ColorRecord,
    ) -> Result<RemoteKey, RemoteError> {
        tokio::time::sleep(self.delay).await;
        self.inner.append(collection, color).await
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn next_sync_lines_is_none_without_passes() {
    let mut passes: JoinSet<SyncPass> = JoinSet::new();
    assert_eq!(next_sync_lines(&mut passes).await, None);
    assert!(drain_sync_passes(&mut passes).await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn draining_waits_for_in_flight_sync() {
    let store = ColorStore::open_in_memory().await.unwrap();
    store
        .insert(&NewColor::new("#A1B2C3", 1000))
        .await
        .unwrap();
    let remote = Arc::new(SlowRemote {
        delay: Duration::from_millis(300),
        inner: MemoryRemoteStore::new(),
    });
    let coordinator = SyncCoordinator::new(store.clone(), Arc::clone(&remote));

    let mut passes: JoinSet<SyncPass> = JoinSet::new();
    passes.spawn(coordinator.spawn_sync());
    let lines = drain_sync_passes(&mut passes).await;

    assert_eq!(lines, vec!["Pushed 1 of 1 colors".to_string()]);
    assert!(passes.is_empty());
    assert_eq!(remote.inner.len(), 1);
    assert!(store.list_unsynced().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn draining_reports_each_pass() {
    let store = ColorStore::open_in_memory().await.unwrap();
    let id = store
        .insert(&NewColor::new("#0000AA", 1000))
        .await
        .unwrap()
        .unwrap();
    let remote = Arc::new(MemoryRemoteStore::new());
    remote.set_offline(true);
    let coordinator = SyncCoordinator::new(store.clone(), Arc::clone(&remote));

    let mut passes: JoinSet<SyncPass> = JoinSet::new();
    passes.spawn(coordinator.spawn_sync());
    let lines = drain_sync_passes(&mut passes).await;

    assert_eq!(lines[0], "Pushed 0 of 1 colors");
    assert!(lines[1].contains(&id.to_string()));
    assert!(lines[1].contains("offline"));
    assert_eq!(store.list_unsynced().await.unwrap().len(), 1);
}
