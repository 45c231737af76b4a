use std::env;
use std::path::{Path, PathBuf};

use chrono::Utc;
use colorcodex_core::models::is_valid_color_code;
use colorcodex_core::{ColorRecord, ColorStore, SyncReport};
use serde::Serialize;

use crate::error::CliError;

pub const ENV_DB_PATH: &str = "COLORCODEX_DB_PATH";

#[derive(Debug, Serialize)]
pub struct ColorListItem {
    pub id: i64,
    pub color_code: String,
    pub created_at: i64,
    pub created_at_iso: String,
    pub relative_time: String,
    pub synced: bool,
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_db_path.or_else(|| env::var_os(ENV_DB_PATH).map(PathBuf::from)) {
        return Ok(path);
    }
    default_db_path().ok_or(CliError::NoDataDir)
}

pub fn default_db_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("colorcodex").join("colors.db"))
}

pub async fn open_store(path: &Path) -> Result<ColorStore, CliError> {
    Ok(ColorStore::open(path).await?)
}

/// Accept `#a1b2c3`, `A1B2C3`, or surrounding whitespace; store as `#A1B2C3`.
pub fn normalize_color_code(raw: &str) -> Result<String, CliError> {
    let trimmed = raw.trim();
    let candidate = if trimmed.starts_with('#') {
        trimmed.to_ascii_uppercase()
    } else {
        format!("#{}", trimmed.to_ascii_uppercase())
    };

    if is_valid_color_code(&candidate) {
        Ok(candidate)
    } else {
        Err(CliError::InvalidColorCode(raw.to_string()))
    }
}

pub fn format_color_lines(colors: &[ColorRecord]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    colors
        .iter()
        .map(|color| {
            let status = if color.synced { "synced" } else { "pending" };
            let relative_time = format_relative_time(color.created_at, now_ms);
            format!(
                "{:>6}  {}  {status:<7}  {relative_time}",
                color.id, color.color_code
            )
        })
        .collect()
}

pub fn color_to_list_item(color: &ColorRecord) -> ColorListItem {
    let now_ms = Utc::now().timestamp_millis();
    ColorListItem {
        id: color.id.get(),
        color_code: color.color_code.clone(),
        created_at: color.created_at,
        created_at_iso: format_timestamp(color.created_at),
        relative_time: format_relative_time(color.created_at, now_ms),
        synced: color.synced,
    }
}

pub fn format_sync_report_lines(report: &SyncReport) -> Vec<String> {
    if report.attempted == 0 {
        return vec!["Nothing to sync".to_string()];
    }

    let mut lines = vec![format!(
        "Pushed {} of {} colors",
        report.synced.len() + report.already_synced.len(),
        report.attempted
    )];
    for failure in &report.remote_failures {
        lines.push(format!(
            "  push failed   {} {}: {}",
            failure.id, failure.color_code, failure.message
        ));
    }
    for failure in &report.local_failures {
        lines.push(format!(
            "  not flagged   {} {}: {} (will be pushed again)",
            failure.id, failure.color_code, failure.message
        ));
    }
    if report.aborted > 0 {
        lines.push(format!("  {} push tasks aborted", report.aborted));
    }
    lines
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

const MINUTE_MS: i64 = 60_000;
const DAY_MS: i64 = 24 * 60 * MINUTE_MS;

/// Largest unit first; anything under a minute is "just now".
const RELATIVE_UNITS: [(i64, &str); 6] = [
    (365 * DAY_MS, "y"),
    (30 * DAY_MS, "mo"),
    (7 * DAY_MS, "w"),
    (DAY_MS, "d"),
    (60 * MINUTE_MS, "h"),
    (MINUTE_MS, "m"),
];

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let elapsed = now_ms.saturating_sub(timestamp_ms);
    RELATIVE_UNITS
        .iter()
        .find(|(unit_ms, _)| elapsed >= *unit_ms)
        .map_or_else(
            || "just now".to_string(),
            |(unit_ms, suffix)| format!("{}{suffix} ago", elapsed / unit_ms),
        )
}

/// Header printed above each live snapshot.
pub fn format_snapshot_header(colors: &[ColorRecord]) -> String {
    let pending = colors.iter().filter(|color| !color.synced).count();
    format!("--- {} colors, {pending} pending ---", colors.len())
}
