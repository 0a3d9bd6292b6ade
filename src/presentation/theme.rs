//! Design settings → root/body classes and CSS custom properties
//!
//! Every pass recomputes the whole surface from the current [`DesignConfig`]:
//! prefixed class families are cleared before the new token is added, so
//! running the same config twice leaves the document unchanged.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::color::HexColor;
use crate::config::DesignConfig;
use crate::config::design::DEFAULT_THEME;
use crate::constants::{classes, css};
use crate::dom::{Document, Element};

static THEME_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^theme-[\w-]+$").expect("valid theme class regex"));
static FONT_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^font-[\w-]+$").expect("valid font class regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Reduce a name to a single class-safe token: whitespace runs become `-`,
/// letters and digits (any script) plus `_` and `-` are kept, the rest dropped
fn class_slug(name: &str) -> String {
    WHITESPACE_RE
        .replace_all(name.trim(), "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

pub fn theme_class(theme: &str) -> String {
    let slug = class_slug(theme);
    let slug = if slug.is_empty() { DEFAULT_THEME.to_string() } else { slug };
    format!("{}{}", classes::THEME_PREFIX, slug)
}

/// `None` when the typography name has no class-safe characters
pub fn font_class(typography: &str) -> Option<String> {
    let slug = class_slug(&typography.to_lowercase());
    (!slug.is_empty()).then(|| format!("{}{}", classes::FONT_PREFIX, slug))
}

/// The configured font name followed by the fallback stack.
///
/// A name containing whitespace is single-quoted unless it is already quoted,
/// since an unquoted multi-word family is only valid CSS when every word is a
/// plain identifier.
pub fn font_family_value(typography: &str) -> String {
    let name = typography.trim();
    if name.is_empty() {
        css::FONT_FALLBACK_STACK.to_string()
    } else if name.contains(char::is_whitespace) && !name.starts_with(['\'', '"']) {
        format!("'{}', {}", name, css::FONT_FALLBACK_STACK)
    } else {
        format!("{}, {}", name, css::FONT_FALLBACK_STACK)
    }
}

/// Gradient and shadow values derived from the primary color, or `None` if
/// the color is not a usable hex value.
///
/// Both embed the color's `#RRGGBB` form: a 6-digit color appears as
/// configured, a 3-digit one is expanded first and an 8-digit one loses its
/// own alpha in favour of the derived suffix.
pub fn derived_color_values(primary_color: &str) -> Option<(String, String)> {
    let color = HexColor::parse(primary_color)?;
    let gradient = format!(
        "linear-gradient(135deg, {} 0%, {} 100%)",
        color.rgb(),
        color.with_alpha(css::GRADIENT_ALPHA)
    );
    let shadow = format!("0 4px 14px 0 {}", color.with_alpha(css::SHADOW_ALPHA));
    Some((gradient, shadow))
}

fn toggle(element: &mut Element, class: &str, on: bool) {
    if on {
        element.add_class(class);
    } else {
        element.remove_class(class);
    }
}

/// Apply the design settings to the document; no-op when absent
pub fn apply_design(doc: &mut Document, design: Option<&DesignConfig>) {
    let Some(design) = design else {
        debug!("No design settings yet, skipping theme pass");
        return;
    };

    let theme = theme_class(&design.theme);
    let font = font_class(&design.typography);

    // Theme token on both root and body
    doc.root.set_class_in_family(&THEME_CLASS_RE, Some(theme.as_str()));
    if let Some(body) = doc.body.as_mut() {
        body.set_class_in_family(&THEME_CLASS_RE, Some(theme.as_str()));
    }

    let root = &mut doc.root;
    root.set_property(css::PRIMARY_COLOR, design.primary_color.as_str());
    match derived_color_values(&design.primary_color) {
        Some((gradient, shadow)) => {
            root.set_property(css::PRIMARY_GRADIENT, gradient);
            root.set_property(css::PRIMARY_SHADOW, shadow);
        }
        None => {
            debug!(primary_color = %design.primary_color, "Primary color is not hex, leaving derived properties unset");
            root.remove_property(css::PRIMARY_GRADIENT);
            root.remove_property(css::PRIMARY_SHADOW);
        }
    }
    root.set_property(css::FONT_FAMILY, font_family_value(&design.typography));
    root.set_property(css::BORDER_RADIUS, design.border_radius.as_str());
    root.set_property(css::SHADOW_STYLE, design.shadow_style.as_str());

    let Some(body) = doc.body.as_mut() else {
        debug!("Document has no body, skipping body classes");
        return;
    };

    body.set_class_in_family(&FONT_CLASS_RE, font.as_deref());

    let (animations_on, animations_off) = if design.animations_enabled {
        (classes::ANIMATIONS_ENABLED, classes::ANIMATIONS_DISABLED)
    } else {
        (classes::ANIMATIONS_DISABLED, classes::ANIMATIONS_ENABLED)
    };
    body.remove_class(animations_off);
    body.add_class(animations_on);

    toggle(body, classes::COMPACT_MODE, design.compact_mode);

    debug!(theme = %theme, font = ?font, compact = design.compact_mode, "Applied design settings");
}
