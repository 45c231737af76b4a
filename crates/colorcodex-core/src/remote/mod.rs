//! Remote store abstraction.
//!
//! The remote side is an append-only sink: every accepted push creates a new
//! entry under the collection, so pushing the same color twice stores it twice.

mod http;
mod memory;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ColorRecord;

pub use http::HttpRemoteStore;
pub use memory::{MemoryEntry, MemoryRemoteStore};

/// Key the remote store assigned to an appended entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteKey(String);

impl RemoteKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire shape of a pushed color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteColor {
    pub id: i64,
    pub color_code: String,
    pub timestamp: i64,
    pub is_synced: bool,
}

impl From<&ColorRecord> for RemoteColor {
    fn from(color: &ColorRecord) -> Self {
        Self {
            id: color.id.get(),
            color_code: color.color_code.clone(),
            timestamp: color.created_at,
            is_synced: color.synced,
        }
    }
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Remote HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote rejected push ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Invalid remote request: {0}")]
    InvalidRequest(String),
    #[error("Invalid remote response: {0}")]
    InvalidResponse(String),
    #[error("Remote unavailable: {0}")]
    Unavailable(String),
}

/// Append-only sink for color records.
pub trait RemoteStore: Send + Sync + 'static {
    /// Append a color under `collection`, resolving once the remote confirms it.
    fn append(
        &self,
        collection: &str,
        color: &ColorRecord,
    ) -> impl Future<Output = Result<RemoteKey, RemoteError>> + Send;
}
