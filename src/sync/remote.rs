//! Remote token source
//!
//! Two endpoints: one answers with a version identifier for the current token
//! set, the other with the full document. The version body is either plain
//! text (first whitespace-separated word, so `sha256sum`-style output works) or
//! JSON carrying a `sha`, `version` or `tag` string, optionally as the first
//! element of an array.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::core::config::RemoteConfig;
use crate::error::SyncError;

/// Source of version identifiers and token documents
pub trait Remote: Send + Sync {
    fn fetch_version(&self) -> Result<String, SyncError>;

    fn fetch_document(&self) -> Result<Vec<u8>, SyncError>;
}

/// Blocking HTTP remote with per-request timeouts
pub struct HttpRemote {
    client: Client,
    config: RemoteConfig,
}

impl HttpRemote {
    pub fn new(config: RemoteConfig) -> Result<Self, SyncError> {
        let client = Client::builder()
            .user_agent(concat!("tokensift/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.version_timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

impl Remote for HttpRemote {
    fn fetch_version(&self) -> Result<String, SyncError> {
        let body = self
            .client
            .get(&self.config.version_url)
            .timeout(self.config.version_timeout)
            .send()?
            .error_for_status()?
            .text()?;
        parse_version_identifier(&body)
            .ok_or_else(|| SyncError::transient("version endpoint returned no identifier"))
    }

    fn fetch_document(&self) -> Result<Vec<u8>, SyncError> {
        let bytes = self
            .client
            .get(&self.config.document_url)
            .timeout(self.config.download_timeout)
            .send()?
            .error_for_status()?
            .bytes()?;
        Ok(bytes.to_vec())
    }
}

/// Extract a version identifier from a version endpoint body
pub fn parse_version_identifier(body: &str) -> Option<String> {
    let body = body.trim();
    if body.starts_with('{') || body.starts_with('[') {
        let value: Value = serde_json::from_str(body).ok()?;
        let object = match &value {
            Value::Array(items) => items.first()?,
            other => other,
        };
        return ["sha", "version", "tag"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }
    body.split_whitespace().next().map(str::to_string)
}
