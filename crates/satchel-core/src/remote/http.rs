//! HTTP backend for the remote file store.
//!
//! Talks to the note server's Dropbox-style REST contract:
//! `GET /metadata{path}?list=true`, `GET /files{path}`,
//! `PUT /files_put{path}?overwrite=true`, `POST /fileops/delete`.
//! Server dates are RFC 2822 strings and are parsed to Unix milliseconds.

use std::env;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{RemoteEntry, RemoteError, RemoteResult, RemoteStore};
use crate::error::{Error, Result};

const ENV_REMOTE_URL: &str = "SATCHEL_REMOTE_URL";
const ENV_REMOTE_TOKEN: &str = "SATCHEL_REMOTE_TOKEN";

/// Remote server configuration
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Server base URL
    pub base_url: String,
    /// Bearer token for the linked account
    pub access_token: String,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl RemoteConfig {
    /// Load remote configuration from environment variables.
    ///
    /// Returns `Ok(None)` when no remote variables are set.
    /// Returns an error when only a partial configuration is provided.
    pub fn from_env() -> Result<Option<Self>> {
        parse_config(|key| env::var(key).ok())
    }
}

fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<RemoteConfig>> {
    let base_url = lookup(ENV_REMOTE_URL)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let access_token = lookup(ENV_REMOTE_TOKEN)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    match (base_url, access_token) {
        (None, None) => Ok(None),
        (Some(base_url), Some(access_token)) => Ok(Some(RemoteConfig {
            base_url: normalize_base_url(base_url)?,
            access_token,
        })),
        (base_url, access_token) => {
            let mut missing = Vec::new();
            if base_url.is_none() {
                missing.push(ENV_REMOTE_URL);
            }
            if access_token.is_none() {
                missing.push(ENV_REMOTE_TOKEN);
            }
            Err(Error::InvalidInput(format!(
                "Remote configuration is incomplete. Missing: {}",
                missing.join(", ")
            )))
        }
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        Ok(raw.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidInput(format!(
            "{ENV_REMOTE_URL} must include http:// or https://"
        )))
    }
}

/// HTTP-backed implementation of [`RemoteStore`]
#[derive(Clone)]
pub struct HttpRemoteStore {
    config: RemoteConfig,
    client: reqwest::Client,
}

impl HttpRemoteStore {
    pub fn new(config: RemoteConfig) -> RemoteResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| RemoteError::Unknown(error.to_string()))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self, prefix: &str, path: &str) -> String {
        format!("{}/{prefix}{path}", self.config.base_url)
    }

    async fn check_status(path: &str, response: reqwest::Response) -> RemoteResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, path, &body))
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn metadata(&self, path: &str, include_contents: bool) -> RemoteResult<RemoteEntry> {
        let response = self
            .client
            .get(self.endpoint("metadata", path))
            .query(&[("list", include_contents)])
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(transport_error)?;

        let payload = Self::check_status(path, response)
            .await?
            .json::<EntryPayload>()
            .await
            .map_err(transport_error)?;
        payload.try_into()
    }

    async fn get_file(&self, path: &str) -> RemoteResult<Vec<u8>> {
        let response = self
            .client
            .get(self.endpoint("files", path))
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(transport_error)?;

        let bytes = Self::check_status(path, response)
            .await?
            .bytes()
            .await
            .map_err(transport_error)?;
        Ok(bytes.to_vec())
    }

    async fn put_file_overwrite(&self, path: &str, bytes: Vec<u8>) -> RemoteResult<RemoteEntry> {
        let response = self
            .client
            .put(self.endpoint("files_put", path))
            .query(&[("overwrite", true)])
            .bearer_auth(&self.config.access_token)
            .body(bytes)
            .send()
            .await
            .map_err(transport_error)?;

        let payload = Self::check_status(path, response)
            .await?
            .json::<EntryPayload>()
            .await
            .map_err(transport_error)?;
        payload.try_into()
    }

    async fn delete(&self, path: &str) -> RemoteResult<()> {
        let response = self
            .client
            .post(self.endpoint("fileops", "/delete"))
            .bearer_auth(&self.config.access_token)
            .json(&serde_json::json!({ "path": path }))
            .send()
            .await
            .map_err(transport_error)?;

        Self::check_status(path, response).await?;
        Ok(())
    }
}

/// Wire form of one entry as the server reports it
#[derive(Debug, Deserialize)]
struct EntryPayload {
    path: String,
    #[serde(default)]
    is_dir: bool,
    #[serde(default)]
    is_deleted: bool,
    modified: Option<String>,
    #[serde(default)]
    contents: Vec<EntryPayload>,
}

impl TryFrom<EntryPayload> for RemoteEntry {
    type Error = RemoteError;

    fn try_from(value: EntryPayload) -> RemoteResult<Self> {
        let modified_at = match value.modified.as_deref() {
            Some(raw) => parse_server_date(raw)?,
            // Folders carry no useful modification time
            None if value.is_dir => 0,
            None => {
                return Err(RemoteError::Protocol(format!(
                    "file entry {} has no modified date",
                    value.path
                )))
            }
        };

        let contents = value
            .contents
            .into_iter()
            .map(Self::try_from)
            .collect::<RemoteResult<Vec<_>>>()?;

        Ok(Self {
            path: value.path,
            is_dir: value.is_dir,
            is_deleted: value.is_deleted,
            modified_at,
            contents,
        })
    }
}

/// Parse the store-native RFC 2822 date string to Unix milliseconds
fn parse_server_date(raw: &str) -> RemoteResult<i64> {
    DateTime::parse_from_rfc2822(raw.trim())
        .map(|date| date.timestamp_millis())
        .map_err(|error| RemoteError::Protocol(format!("invalid date '{raw}': {error}")))
}

fn map_status(status: StatusCode, path: &str, body: &str) -> RemoteError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unlinked,
        StatusCode::NOT_FOUND => RemoteError::NotFound(path.to_string()),
        _ => RemoteError::Unknown(parse_api_error(status, body)),
    }
}

fn transport_error(error: reqwest::Error) -> RemoteError {
    if error.is_decode() {
        RemoteError::Protocol(error.to_string())
    } else if error.is_timeout() || error.is_connect() || error.is_request() || error.is_body() {
        RemoteError::Network(error.to_string())
    } else {
        RemoteError::Unknown(error.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}
