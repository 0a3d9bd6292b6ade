//! Hex color parsing for CSS-derived values
//!
//! Accepts `RGB`, `RRGGBB` and `RRGGBBAA` forms with an optional `#` prefix
//! and normalizes all of them to `#RRGGBB`:
//! - `RRGGBB` is kept verbatim, casing included
//! - `RGB` is expanded digit by digit (`#f0a` becomes `#ff00aa`)
//! - `RRGGBBAA` drops its alpha, derived values append their own
//!
//! Only the 6-digit form therefore reappears unchanged in derived strings.

/// A parsed CSS hex color, stored as its 6-digit `#RRGGBB` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexColor {
    rgb: String,
}

impl HexColor {
    /// Parse a hex color string, returning None for anything malformed
    pub fn parse(input: &str) -> Option<Self> {
        let digits = input.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let rgb = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
            // Existing alpha channel is dropped; derived values supply their own
            6 | 8 => digits[..6].to_string(),
            _ => return None,
        };

        Some(Self { rgb: format!("#{rgb}") })
    }

    /// `#RRGGBB` form
    pub fn rgb(&self) -> &str {
        &self.rgb
    }

    /// `#RRGGBBAA` form using a two-digit hex alpha suffix
    pub fn with_alpha(&self, alpha: &str) -> String {
        format!("{}{}", self.rgb, alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit_keeps_casing() {
        let color = HexColor::parse("#3B82F6").unwrap();
        assert_eq!(color.rgb(), "#3B82F6");

        let color = HexColor::parse("#3b82f6").unwrap();
        assert_eq!(color.rgb(), "#3b82f6");
    }

    #[test]
    fn test_parse_without_hash_prefix() {
        let color = HexColor::parse("10B981").unwrap();
        assert_eq!(color.rgb(), "#10B981");
    }

    #[test]
    fn test_parse_short_form_expands() {
        let color = HexColor::parse("#f0a").unwrap();
        assert_eq!(color.rgb(), "#ff00aa");
    }

    #[test]
    fn test_parse_eight_digit_drops_alpha() {
        let color = HexColor::parse("#3B82F6CC").unwrap();
        assert_eq!(color.with_alpha("80"), "#3B82F680");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(HexColor::parse("").is_none());
        assert!(HexColor::parse("#").is_none());
        assert!(HexColor::parse("blue").is_none());
        assert!(HexColor::parse("#12345").is_none());
        assert!(HexColor::parse("#GGGGGG").is_none());
        assert!(HexColor::parse("rgb(0, 0, 0)").is_none());
    }

    #[test]
    fn test_with_alpha() {
        let color = HexColor::parse("#3B82F6").unwrap();
        assert_eq!(color.with_alpha("26"), "#3B82F626");
    }
}
