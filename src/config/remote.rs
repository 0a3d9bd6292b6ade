//! School-wide settings resource
//!
//! Mirrors the JSON object served by the settings endpoint. Every field is
//! defaulted so a sparse response still deserializes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tenant settings: identity, academic period, locale, assets, feature flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    // Identity and contact
    #[serde(default)]
    pub school_name: String,
    #[serde(default)]
    pub school_address: String,
    #[serde(default)]
    pub school_phone: String,
    #[serde(default)]
    pub school_email: String,

    // Academic period
    #[serde(default)]
    pub academic_year: String,
    #[serde(default)]
    pub current_term: String,

    // Locale
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_language")]
    pub language: String,

    /// May be relative to the API host
    #[serde(default)]
    pub school_logo: Option<String>,
    /// May be relative to the API host
    #[serde(default)]
    pub favicon: Option<String>,

    // Feature flags
    #[serde(default = "default_true")]
    pub auto_save: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub maintenance_mode: bool,

    // Policy
    /// Minutes
    #[serde(default = "default_session_timeout")]
    pub session_timeout: u32,
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_date_format() -> String {
    "YYYY-MM-DD".to_string()
}

fn default_time_format() -> String {
    "24h".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

fn default_session_timeout() -> u32 {
    30
}

fn default_max_login_attempts() -> u32 {
    5
}
