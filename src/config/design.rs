//! Visual theming resource
//!
//! Missing fields fall back to the documented default one by one, so a partial
//! response never gets rejected wholesale.

use serde::{Deserialize, Serialize};

/// Primary color used when the design settings are absent or partial
pub const DEFAULT_PRIMARY_COLOR: &str = "#3B82F6";

/// Theme name used when the design settings are absent or partial
pub const DEFAULT_THEME: &str = "default";

/// Visual settings: color, theme, typography and layout density
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignConfig {
    /// Hex string; not validated here, appliers tolerate malformed values
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    /// Open-ended: "default", "premium", "dark", ...
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_true")]
    pub animations_enabled: bool,
    #[serde(default)]
    pub compact_mode: bool,
    #[serde(default = "default_typography")]
    pub typography: String,
    #[serde(default = "default_border_radius")]
    pub border_radius: String,
    #[serde(default = "default_shadow_style")]
    pub shadow_style: String,
}

fn default_primary_color() -> String {
    DEFAULT_PRIMARY_COLOR.to_string()
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_typography() -> String {
    "Inter".to_string()
}

fn default_border_radius() -> String {
    "8px".to_string()
}

fn default_shadow_style() -> String {
    "0 1px 3px rgba(0, 0, 0, 0.1)".to_string()
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            primary_color: default_primary_color(),
            theme: default_theme(),
            animations_enabled: default_true(),
            compact_mode: false,
            typography: default_typography(),
            border_radius: default_border_radius(),
            shadow_style: default_shadow_style(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record() {
        let design = DesignConfig::default();
        assert_eq!(design.theme, "default");
        assert_eq!(design.primary_color, "#3B82F6");
        assert!(design.animations_enabled);
        assert!(!design.compact_mode);
    }

    #[test]
    fn test_empty_object_equals_default() {
        let design: DesignConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(design, DesignConfig::default());
    }

    #[test]
    fn test_partial_response_falls_back_per_field() {
        let design: DesignConfig =
            serde_json::from_str(r#"{"theme": "premium", "compact_mode": true}"#).unwrap();
        assert_eq!(design.theme, "premium");
        assert!(design.compact_mode);
        assert_eq!(design.primary_color, DEFAULT_PRIMARY_COLOR);
        assert_eq!(design.typography, "Inter");
    }
}
