use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] colorcodex_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid color code {0:?}: expected #RRGGBB")]
    InvalidColorCode(String),
    #[error("Could not resolve a data directory; pass --db-path or set COLORCODEX_DB_PATH")]
    NoDataDir,
    #[error("{0} of {1} colors could not be synced")]
    SyncIncomplete(usize, usize),
    #[error(
        "Sync is not configured. Set COLORCODEX_REMOTE_URL (and optionally COLORCODEX_REMOTE_AUTH) to enable `colorcodex sync`."
    )]
    SyncNotConfigured,
}
