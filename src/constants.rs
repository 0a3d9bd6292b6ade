//! Application-wide constants
//!
//! Endpoint paths, CSS property names, class tokens and storage keys shared by
//! the stores, the appliers and the binary.

/// Backend endpoint paths (relative to the configured API base URL)
pub mod endpoints {
    /// School/tenant settings resource (GET + PUT)
    pub const SETTINGS: &str = "settings/";

    /// Design settings resource (GET)
    pub const DESIGN_SETTINGS: &str = "settings/design/";

    /// Logo upload (multipart POST)
    pub const UPLOAD_LOGO: &str = "settings/upload-logo/";

    /// Favicon upload (multipart POST)
    pub const UPLOAD_FAVICON: &str = "settings/upload-favicon/";

    /// Multipart field carrying the uploaded file
    pub const UPLOAD_FIELD: &str = "file";
}

/// CSS custom properties written on the root element
pub mod css {
    pub const PRIMARY_COLOR: &str = "--primary-color";
    pub const PRIMARY_GRADIENT: &str = "--primary-gradient";
    pub const PRIMARY_SHADOW: &str = "--primary-shadow";
    pub const FONT_FAMILY: &str = "--font-family";
    pub const BORDER_RADIUS: &str = "--border-radius";
    pub const SHADOW_STYLE: &str = "--shadow-style";

    /// Hex alpha suffix for the faded end of the gradient (~50%)
    pub const GRADIENT_ALPHA: &str = "80";

    /// Hex alpha suffix for the box-shadow tint (~15%)
    pub const SHADOW_ALPHA: &str = "26";

    /// Appended after the configured typography name
    pub const FONT_FALLBACK_STACK: &str =
        "system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif";
}

/// Class tokens toggled on the root and body elements
pub mod classes {
    pub const THEME_PREFIX: &str = "theme-";
    pub const FONT_PREFIX: &str = "font-";
    pub const ANIMATIONS_ENABLED: &str = "animations-enabled";
    pub const ANIMATIONS_DISABLED: &str = "animations-disabled";
    pub const COMPACT_MODE: &str = "compact-mode";
}

/// Favicon link handling
pub mod favicon {
    /// Any head link whose rel contains this is treated as a favicon link
    pub const REL_MARKER: &str = "icon";

    /// Rel values inserted on every sync
    pub const RELS: [&str; 3] = ["icon", "shortcut icon", "apple-touch-icon"];

    /// Cache-busting query parameter name
    pub const CACHE_BUST_PARAM: &str = "t";
}

/// Persistent storage keys and file locations
pub mod storage {
    /// Contact ribbon visibility flag
    pub const CONTACT_RIBBON_KEY: &str = "contact_ribbon_visible";

    /// File name of the JSON key/value store under the app config dir
    pub const FILENAME: &str = "storage.json";
}

/// Configuration file location
pub mod config {
    pub const APP_DIR: &str = "school-portal-theme";
    pub const FILENAME: &str = "config.json";

    pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

    /// Env var overriding the API base URL
    pub const API_URL_ENV: &str = "SCHOOL_PORTAL_API_URL";

    /// Env var overriding the log level
    pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
}

/// Validation limits for configuration values
pub mod validation {
    pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
    pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;
}
