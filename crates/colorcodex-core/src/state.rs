//! Shared sync state types.

use std::fmt;

use serde::Serialize;

/// Phase of the most recent sync pass, as published by the coordinator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// No pass has run yet
    #[default]
    Idle,
    /// A pass is in flight
    Syncing,
    /// The last pass pushed every record it saw
    Synced,
    /// The last pass left records unsynced or could not read the store
    Error,
}

impl SyncState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Syncing => "syncing",
            Self::Synced => "synced",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
