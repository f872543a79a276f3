//! Display text formatting for item views.

use serde::{Deserialize, Serialize};

/// How a value is turned into display text.
///
/// Numbers are formatted first, then wrapped in the prefix and suffix.
/// Floats keep at least one and at most two decimals.
///
/// ```
/// use simpleui::view::TextFormat;
///
/// let format = TextFormat::new().with_prefix("x").with_show_sign(true);
/// assert_eq!(format.format_int(3), "x+3");
/// assert_eq!(format.format_float(-1.5), "x-1.5");
/// assert_eq!(format.format_float(2.0), "x+2.0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFormat {
    /// Text placed before the value.
    pub prefix: String,
    /// Text placed after the value.
    pub suffix: String,
    /// Prefix positive numbers with `+`.
    pub show_sign: bool,
    /// Hide the view while its text is empty.
    pub hide_if_empty: bool,
}

impl TextFormat {
    /// A format with no affixes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix using builder pattern.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the suffix using builder pattern.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets sign display using builder pattern.
    pub fn with_show_sign(mut self, show_sign: bool) -> Self {
        self.show_sign = show_sign;
        self
    }

    /// Sets hide-if-empty using builder pattern.
    pub fn with_hide_if_empty(mut self, hide_if_empty: bool) -> Self {
        self.hide_if_empty = hide_if_empty;
        self
    }

    /// Wraps `text` in the prefix and suffix.
    pub fn format_str(&self, text: &str) -> String {
        format!("{}{}{}", self.prefix, text, self.suffix)
    }

    /// Formats an integer.
    pub fn format_int(&self, value: i64) -> String {
        let sign = if self.show_sign && value > 0 { "+" } else { "" };
        self.format_str(&format!("{sign}{value}"))
    }

    /// Formats a float with one or two decimals.
    pub fn format_float(&self, value: f64) -> String {
        let sign = if self.show_sign && value > 0.0 { "+" } else { "" };
        let mut digits = format!("{value:.2}");
        if value.is_finite() && digits.ends_with('0') {
            digits.pop();
        }
        self.format_str(&format!("{sign}{digits}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_decimals() {
        let format = TextFormat::new();
        assert_eq!(format.format_float(1.0), "1.0");
        assert_eq!(format.format_float(1.25), "1.25");
        assert_eq!(format.format_float(3.14159), "3.14");
        assert_eq!(format.format_float(0.5), "0.5");
        assert_eq!(format.format_float(-12.3), "-12.3");
    }

    #[test]
    fn test_sign_only_for_positive_values() {
        let format = TextFormat::new().with_show_sign(true);
        assert_eq!(format.format_int(0), "0");
        assert_eq!(format.format_int(-4), "-4");
        assert_eq!(format.format_int(4), "+4");
        assert_eq!(format.format_float(0.0), "0.0");
    }

    #[test]
    fn test_affixes() {
        let format = TextFormat::new().with_prefix("Gold: ").with_suffix(" g");
        assert_eq!(format.format_str("many"), "Gold: many g");
        assert_eq!(format.format_int(12), "Gold: 12 g");
    }

    #[test]
    fn test_deserialize_partial() {
        let format: TextFormat = toml::from_str("suffix = \"%\"\nshow_sign = true").unwrap();
        assert_eq!(format.format_float(12.5), "+12.5%");
        assert!(!format.hide_if_empty);
    }
}
