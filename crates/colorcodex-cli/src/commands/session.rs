use std::path::Path;

use colorcodex_core::util::unix_millis_now;
use colorcodex_core::{NewColor, SyncReport};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};

use crate::commands::common::{
    format_color_lines, format_snapshot_header, format_sync_report_lines, normalize_color_code,
    open_store,
};
use crate::commands::sync::remote_coordinator;
use crate::error::CliError;

#[derive(Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Add the given color, or a random one
    Add(Option<String>),
    Sync,
    Status,
    Help,
    Quit,
}

pub fn parse_session_command(line: &str) -> Result<Option<SessionCommand>, CliError> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "a" | "add" => SessionCommand::Add(parts.next().map(normalize_color_code).transpose()?),
        "s" | "sync" => SessionCommand::Sync,
        "status" => SessionCommand::Status,
        "q" | "quit" | "exit" => SessionCommand::Quit,
        _ => SessionCommand::Help,
    };
    Ok(Some(command))
}

const HELP: &str = "commands: add [#RRGGBB] | sync | status | quit";

/// Outcome of a pass started with `SyncCoordinator::spawn_sync`.
pub type SyncPass = Result<colorcodex_core::Result<SyncReport>, JoinError>;

/// Wait for the next running pass and render its outcome.
///
/// Returns `None` once no pass is left.
pub async fn next_sync_lines(passes: &mut JoinSet<SyncPass>) -> Option<Vec<String>> {
    let joined = passes.join_next().await?;
    Some(match joined.and_then(|pass| pass) {
        Ok(Ok(report)) => format_sync_report_lines(&report),
        Ok(Err(error)) => vec![format!("Sync failed: {error}")],
        Err(error) => vec![format!("Sync task failed: {error}")],
    })
}

/// Wait for every running pass, so pushes the remote accepted get flagged.
pub async fn drain_sync_passes(passes: &mut JoinSet<SyncPass>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(pass_lines) = next_sync_lines(passes).await {
        lines.extend(pass_lines);
    }
    lines
}

pub async fn run_session(unsynced: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path).await?;
    let coordinator = match remote_coordinator(&store) {
        Ok(coordinator) => Some(coordinator),
        Err(CliError::SyncNotConfigured) => None,
        Err(error) => return Err(error),
    };
    let mut subscription = if unsynced {
        store.watch_unsynced()
    } else {
        store.watch_all()
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut passes: JoinSet<SyncPass> = JoinSet::new();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    eprintln!("{HELP}");
    let outcome: Result<(), CliError> = loop {
        tokio::select! {
            snapshot = subscription.next() => {
                let colors = match snapshot {
                    Some(Ok(colors)) => colors,
                    Some(Err(error)) => break Err(error.into()),
                    None => break Ok(()),
                };
                println!("{}", format_snapshot_header(&colors));
                for line in format_color_lines(&colors) {
                    println!("{line}");
                }
            }
            Some(report) = next_sync_lines(&mut passes), if !passes.is_empty() => {
                for line in report {
                    eprintln!("{line}");
                }
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break Ok(()),
                    Err(error) => break Err(error.into()),
                };
                let command = match parse_session_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(error) => {
                        eprintln!("{error}");
                        continue;
                    }
                };

                match command {
                    SessionCommand::Add(code) => {
                        let color = code.map_or_else(NewColor::random, |code| {
                            NewColor::new(code, unix_millis_now())
                        });
                        if let Err(error) = store.insert(&color).await {
                            eprintln!("Failed to store color: {error}");
                        }
                    }
                    SessionCommand::Sync => {
                        let Some(coordinator) = &coordinator else {
                            eprintln!("{}", CliError::SyncNotConfigured);
                            continue;
                        };
                        passes.spawn(coordinator.spawn_sync());
                    }
                    SessionCommand::Status => {
                        let state = coordinator.as_ref().map_or_else(
                            || "not configured".to_string(),
                            |coordinator| coordinator.state().borrow().to_string(),
                        );
                        eprintln!("sync: {state}, {} passes running", passes.len());
                    }
                    SessionCommand::Help => eprintln!("{HELP}"),
                    SessionCommand::Quit => break Ok(()),
                }
            }
            _ = &mut ctrl_c => {
                tracing::debug!("Interrupted, ending session");
                break Ok(());
            }
        }
    };

    if !passes.is_empty() {
        eprintln!("Waiting for {} sync passes to finish", passes.len());
    }
    for line in drain_sync_passes(&mut passes).await {
        eprintln!("{line}");
    }
    outcome
}
