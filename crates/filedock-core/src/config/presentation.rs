//! URL generation and display configuration.

use serde::{Deserialize, Serialize};

/// How byte counts are bucketed into units for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeScale {
    /// `floor(log1024(bytes))`.
    #[default]
    Binary,
    /// `floor((decimal_digits(bytes) - 1) / 3)`: one unit step per three
    /// decimal digits.
    DigitCount,
}

/// Presentation settings shared by every URL context built from config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Application base URL that stream/download/image routes hang off.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Locale used when the caller does not pick one.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Locale consulted when a translation is missing.
    #[serde(default = "default_locale")]
    pub fallback_locale: String,
    /// Unit bucketing for readable sizes.
    #[serde(default)]
    pub size_scale: SizeScale,
    /// CSS class attached to rendered thumbnails.
    #[serde(default = "default_thumbnail_class")]
    pub thumbnail_class: String,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_locale: default_locale(),
            fallback_locale: default_locale(),
            size_scale: SizeScale::default(),
            thumbnail_class: default_thumbnail_class(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_thumbnail_class() -> String {
    "img-rounded".to_string()
}
