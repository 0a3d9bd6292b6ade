//! REST backend seam
//!
//! Stores talk to the backend only through [`SettingsBackend`], which keeps
//! them testable against an in-process fake. [`http::HttpBackend`] is the
//! reqwest implementation used by the binary.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::constants::endpoints;
use crate::urls::resolve_asset_url;

pub mod http;

pub use http::HttpBackend;

/// Failure talking to the backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Network unreachable, timeout, connection reset
    #[error("network error: {0}")]
    Transport(String),
    /// Non-2xx response; `message` is the server's text when it sent one
    #[error("{message}")]
    Status { status: u16, message: String },
    /// 2xx response whose body was not the expected JSON
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error, preferring the `error` or `message` field of a
    /// JSON body over `fallback`
    pub fn from_status(status: u16, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                ["error", "message"].iter().find_map(|key| {
                    v.get(key)
                        .and_then(Value::as_str)
                        .filter(|s| !s.trim().is_empty())
                        .map(str::to_string)
                })
            })
            .unwrap_or_else(|| fallback.to_string());

        ApiError::Status { status, message }
    }
}

/// JSON-over-HTTP operations the stores need
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// GET `path`, expecting a 2xx JSON body
    async fn get_json(&self, path: &str) -> Result<Value, ApiError>;

    /// PUT `body` to `path`, returning the canonical object the server echoes
    async fn put_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// POST `bytes` as multipart form data under the `file` field
    async fn upload(&self, path: &str, file_name: &str, bytes: Vec<u8>) -> Result<Value, ApiError>;

    /// Configured API base URL, used to resolve relative asset paths
    fn api_base_url(&self) -> &str;
}

/// Uploadable settings assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Logo,
    Favicon,
}

impl AssetKind {
    pub fn endpoint(self) -> &'static str {
        match self {
            AssetKind::Logo => endpoints::UPLOAD_LOGO,
            AssetKind::Favicon => endpoints::UPLOAD_FAVICON,
        }
    }

    /// Key holding the stored asset's URL in the upload response
    pub fn response_key(self) -> &'static str {
        match self {
            AssetKind::Logo => "logo_url",
            AssetKind::Favicon => "favicon_url",
        }
    }
}

/// Upload a logo or favicon and return its absolute URL
pub async fn upload_asset(
    backend: &dyn SettingsBackend,
    kind: AssetKind,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<String, ApiError> {
    let size = bytes.len();
    let body = backend.upload(kind.endpoint(), file_name, bytes).await?;

    let url = body
        .get(kind.response_key())
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Decode(format!("upload response missing '{}'", kind.response_key())))?;

    let resolved = resolve_asset_url(Some(url), backend.api_base_url());
    info!(kind = ?kind, file = %file_name, bytes = size, url = %resolved, "Uploaded settings asset");
    Ok(resolved)
}
