//! Application configuration
//!
//! JSON file under the user config dir, with env var overrides for the API
//! base URL and log level.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::constants::{config, storage, validation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the REST backend, usually ending in `/api`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Override for the persistent key/value storage file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    config::DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            storage_path: None,
            log_level: default_log_level(),
        }
    }
}

/// `<config_dir>/school-portal-theme/<file>`
fn app_dir_file(file: &str) -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(config::APP_DIR);
    path.push(file);
    path
}

fn resolve_log_level(env_level: Option<String>, path: &Path) -> String {
    if let Some(level) = env_level.filter(|l| !l.trim().is_empty()) {
        return level;
    }
    fs::read_to_string(path)
        .ok()
        .and_then(|contents| serde_json::from_str::<AppConfig>(&contents).ok())
        .map_or_else(default_log_level, |c| c.log_level)
}

impl AppConfig {
    pub fn path() -> PathBuf {
        app_dir_file(config::FILENAME)
    }

    /// Level to start logging at, worked out before the config is loaded so
    /// that loading itself is logged: `LOG_LEVEL`, then the file's
    /// `log_level`, then `info`. Never logs and never fails.
    pub fn startup_log_level(path: Option<&Path>) -> String {
        let path = path.map_or_else(Self::path, Path::to_path_buf);
        resolve_log_level(std::env::var(config::LOG_LEVEL_ENV).ok(), &path)
    }

    /// Load from `path` (or the default location), then apply env overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut loaded = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load_from(&Self::path())?,
        };
        loaded.apply_env_overrides(
            std::env::var(config::API_URL_ENV).ok(),
            std::env::var(config::LOG_LEVEL_ENV).ok(),
        );
        Ok(loaded)
    }

    /// Load from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let mut config: AppConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON from {:?}", path))?;

        config.validate_and_clamp();
        info!(path = %path.display(), api = %config.api_base_url, "Loaded config");
        Ok(config)
    }

    fn apply_env_overrides(&mut self, api_url: Option<String>, log_level: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            info!(api = %url, "API base URL overridden from environment");
            self.api_base_url = url;
        }
        if let Some(level) = log_level.filter(|l| !l.trim().is_empty()) {
            self.log_level = level;
        }
    }

    fn validate_and_clamp(&mut self) {
        use validation::*;

        if self.request_timeout_secs < MIN_REQUEST_TIMEOUT_SECS {
            warn!(request_timeout_secs = self.request_timeout_secs, min = MIN_REQUEST_TIMEOUT_SECS, "request_timeout_secs below minimum, clamping");
            self.request_timeout_secs = MIN_REQUEST_TIMEOUT_SECS;
        } else if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            warn!(request_timeout_secs = self.request_timeout_secs, max = MAX_REQUEST_TIMEOUT_SECS, "request_timeout_secs exceeds maximum, clamping");
            self.request_timeout_secs = MAX_REQUEST_TIMEOUT_SECS;
        }

        if self.api_base_url.trim().is_empty() {
            warn!(using = config::DEFAULT_API_BASE_URL, "api_base_url is empty, using default");
            self.api_base_url = default_api_base_url();
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Where the persistent key/value storage lives
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(|| app_dir_file(storage::FILENAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_base_url": "https://api.example.com/api"}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com/api");
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_timeout_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        fs::write(&path, r#"{"request_timeout_secs": 0}"#).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap().request_timeout_secs, 1);

        fs::write(&path, r#"{"request_timeout_secs": 9000}"#).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap().request_timeout_secs, 120);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(Some("https://school.test/api".to_string()), Some("debug".to_string()));
        assert_eq!(config.api_base_url, "https://school.test/api");
        assert_eq!(config.log_level, "debug");

        // Blank values are ignored
        config.apply_env_overrides(Some("  ".to_string()), None);
        assert_eq!(config.api_base_url, "https://school.test/api");
    }

    #[test]
    fn test_startup_log_level_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert_eq!(resolve_log_level(None, &path), "info");

        fs::write(&path, r#"{"log_level": "debug", "request_timeout_secs": 0}"#).unwrap();
        assert_eq!(resolve_log_level(None, &path), "debug");
        assert_eq!(resolve_log_level(Some("trace".to_string()), &path), "trace");
        assert_eq!(resolve_log_level(Some(" ".to_string()), &path), "debug");

        // A broken file is reported later by load, not here
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(resolve_log_level(None, &path), "info");
    }

    #[test]
    fn test_storage_path_override() {
        let config = AppConfig {
            storage_path: Some(PathBuf::from("/tmp/flags.json")),
            ..AppConfig::default()
        };
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/flags.json"));
    }
}
