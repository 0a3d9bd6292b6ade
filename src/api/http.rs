//! reqwest-backed [`SettingsBackend`]

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ApiError, SettingsBackend};
use crate::constants::endpoints;

/// JSON client for the settings API
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Join `path` onto the base URL with exactly one `/` between them
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn read_json(response: reqwest::Response, fallback: &str) -> Result<Value, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Settings API returned non-success status");
            return Err(ApiError::from_status(status.as_u16(), &body, fallback));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

#[async_trait]
impl SettingsBackend for HttpBackend {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(path);
        debug!(url = %url, "GET");
        let response = self.client.get(&url).send().await.map_err(transport)?;
        Self::read_json(response, "Failed to fetch settings").await
    }

    async fn put_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.endpoint(path);
        debug!(url = %url, "PUT");
        let response = self
            .client
            .put(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        Self::read_json(response, "Failed to update settings").await
    }

    async fn upload(&self, path: &str, file_name: &str, bytes: Vec<u8>) -> Result<Value, ApiError> {
        let url = self.endpoint(path);
        debug!(url = %url, file = %file_name, "POST multipart");
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part(endpoints::UPLOAD_FIELD, part);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        Self::read_json(response, "Failed to upload file").await
    }

    fn api_base_url(&self) -> &str {
        &self.base_url
    }
}
