//! Remote push configuration.
//!
//! Describes where unsynced colors are appended. Values usually come from the
//! environment (optionally seeded from a `.env` file by the CLI).

use std::env;

use serde::{Deserialize, Serialize};

use crate::util::{has_http_scheme, non_blank};
use crate::{Error, Result};

pub const ENV_REMOTE_URL: &str = "COLORCODEX_REMOTE_URL";
pub const ENV_REMOTE_COLLECTION: &str = "COLORCODEX_REMOTE_COLLECTION";
pub const ENV_REMOTE_AUTH: &str = "COLORCODEX_REMOTE_AUTH";

/// Collection colors are appended to when none is configured.
pub const DEFAULT_COLLECTION: &str = "colors";

/// Remote database endpoint for color pushes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Database root URL (e.g. `https://my-app.firebaseio.com`)
    pub base_url: String,
    /// Collection path colors are appended to
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Optional database secret or ID token, sent as the `auth` query parameter
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("collection", &self.collection)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl RemoteConfig {
    /// Create a configuration for the default collection without auth.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.into())?,
            collection: DEFAULT_COLLECTION.to_string(),
            auth_token: None,
        })
    }

    /// Append to a different collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Result<Self> {
        self.collection = normalize_collection(&collection.into())?;
        Ok(self)
    }

    /// Authenticate pushes with the given token.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = non_blank(Some(token.into()));
        self
    }

    /// Load remote configuration from environment variables.
    ///
    /// Returns `Ok(None)` when no remote URL is set.
    pub fn from_env() -> Result<Option<Self>> {
        parse_config(|key| env::var(key).ok())
    }
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

/// Build a configuration from an arbitrary key lookup.
pub fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<RemoteConfig>> {
    let Some(base_url) = non_blank(lookup(ENV_REMOTE_URL)) else {
        if non_blank(lookup(ENV_REMOTE_AUTH)).is_some() {
            return Err(Error::Config(format!(
                "{ENV_REMOTE_AUTH} is set but {ENV_REMOTE_URL} is missing"
            )));
        }
        return Ok(None);
    };

    let mut config = RemoteConfig::new(base_url)?;
    if let Some(collection) = non_blank(lookup(ENV_REMOTE_COLLECTION)) {
        config = config.with_collection(collection)?;
    }
    if let Some(token) = lookup(ENV_REMOTE_AUTH) {
        config = config.with_auth_token(token);
    }

    Ok(Some(config))
}

fn normalize_base_url(raw: String) -> Result<String> {
    let url = non_blank(Some(raw))
        .ok_or_else(|| Error::Config(format!("{ENV_REMOTE_URL} must not be empty")))?;
    if !has_http_scheme(&url) {
        return Err(Error::Config(format!(
            "{ENV_REMOTE_URL} must include http:// or https://"
        )));
    }
    Ok(url.trim_end_matches('/').to_string())
}

/// Normalize a collection path: trims slashes and rejects characters the
/// realtime database does not allow in keys.
pub fn normalize_collection(raw: &str) -> Result<String> {
    let collection = raw.trim().trim_matches('/');
    if collection.is_empty() {
        return Err(Error::Config("collection must not be empty".to_string()));
    }
    if collection
        .chars()
        .any(|c| matches!(c, '.' | '$' | '#' | '[' | ']') || c.is_control())
    {
        return Err(Error::Config(format!(
            "collection {collection:?} contains a forbidden character"
        )));
    }
    if collection.split('/').any(str::is_empty) {
        return Err(Error::Config(format!(
            "collection {collection:?} contains an empty path segment"
        )));
    }
    Ok(collection.to_string())
}
