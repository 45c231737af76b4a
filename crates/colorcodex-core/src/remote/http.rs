//! Realtime database REST client.
//!
//! `POST {base_url}/{collection}.json` pushes a child with a server-generated
//! key and answers `{"name": "<key>"}`.

use reqwest::StatusCode;
use serde::Deserialize;

use super::{RemoteColor, RemoteError, RemoteKey, RemoteStore};
use crate::config::{normalize_collection, RemoteConfig};
use crate::models::ColorRecord;
use crate::util::excerpt;
use crate::Result;

#[derive(Clone)]
pub struct HttpRemoteStore {
    config: RemoteConfig,
    client: reqwest::Client,
}

impl HttpRemoteStore {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(RemoteError::from)?;
        Ok(Self { config, client })
    }

    pub const fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn collection_url(&self, collection: &str) -> std::result::Result<String, RemoteError> {
        let collection = normalize_collection(collection)
            .map_err(|error| RemoteError::InvalidRequest(error.to_string()))?;
        Ok(format!("{}/{collection}.json", self.config.base_url))
    }
}

impl RemoteStore for HttpRemoteStore {
    async fn append(
        &self,
        collection: &str,
        color: &ColorRecord,
    ) -> std::result::Result<RemoteKey, RemoteError> {
        let url = self.collection_url(collection)?;
        let payload = RemoteColor::from(color);

        let mut request = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(&payload);
        if let Some(token) = &self.config.auth_token {
            request = request.query(&[("auth", token.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                message: parse_api_error(status, &body),
            });
        }

        parse_push_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_push_response(body: &str) -> std::result::Result<RemoteKey, RemoteError> {
    let payload: PushResponse = serde_json::from_str(body).map_err(|error| {
        RemoteError::InvalidResponse(format!("{error}: {}", excerpt(body)))
    })?;

    payload
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .map(RemoteKey::new)
        .ok_or_else(|| RemoteError::InvalidResponse("response did not include name".to_string()))
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.error.or(payload.message) {
            return excerpt(&message);
        }
    }

    let trimmed = excerpt(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed
    }
}
