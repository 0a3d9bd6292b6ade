//! Relative-to-absolute asset URL resolution

/// Resolve a possibly relative asset URL against the API base URL
///
/// Absolute `http://`/`https://` URLs pass through unchanged. Relative paths are
/// joined onto the base with its trailing `/api` segment removed, since media
/// is served from the host root. Empty or absent input yields an empty string.
pub fn resolve_asset_url(url: Option<&str>, api_base_url: &str) -> String {
    let url = match url.map(str::trim) {
        Some(u) if !u.is_empty() => u,
        _ => return String::new(),
    };

    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return url.to_string();
    }

    let base = api_base_url.trim_end_matches('/');
    let base = base.strip_suffix("/api").unwrap_or(base);
    let base = base.trim_end_matches('/');

    format!("{}/{}", base, url.trim_start_matches('/'))
}
