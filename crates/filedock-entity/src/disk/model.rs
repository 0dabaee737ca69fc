//! Disk entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filedock_core::types::{DiskId, Translations};

/// A named storage backend that files and folders live on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    /// Unique disk identifier.
    pub id: DiskId,
    /// Unique slug, used in disk paths (`slug://…`) and URLs.
    pub slug: String,
    /// Name of the mounted adapter holding the bytes.
    pub adapter: String,
    /// Translatable display name, unique per locale.
    pub name: Translations,
    /// Translatable description.
    pub description: Translations,
    /// When the disk was created.
    pub created_at: DateTime<Utc>,
    /// When the disk was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Disk {
    /// Display name for a locale, falling back to the slug.
    pub fn display_name<'a>(&'a self, locale: &str, fallback: &str) -> &'a str {
        self.name.get(locale, fallback).unwrap_or(&self.slug)
    }

    /// Description for a locale, if any translation exists.
    pub fn display_description<'a>(&'a self, locale: &str, fallback: &str) -> Option<&'a str> {
        self.description.get(locale, fallback)
    }
}

/// Data required to create a new disk record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDisk {
    /// Unique slug.
    pub slug: String,
    /// Mounted adapter name.
    pub adapter: String,
    /// Display name translations.
    pub name: Translations,
    /// Description translations.
    pub description: Translations,
}

/// Slugs are lowercase ASCII letters, digits, `-` and `_`, starting with a
/// letter or digit.
pub fn is_valid_slug(slug: &str) -> bool {
    let mut chars = slug.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_rules() {
        assert!(is_valid_slug("local"));
        assert!(is_valid_slug("s3-eu_1"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-local"));
        assert!(!is_valid_slug("Local"));
        assert!(!is_valid_slug("my disk"));
    }

    #[test]
    fn test_display_name_falls_back_to_slug() {
        let now = Utc::now();
        let disk = Disk {
            id: DiskId::new(),
            slug: "archive".into(),
            adapter: "local".into(),
            name: Translations::new(),
            description: Translations::new(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(disk.display_name("en", "en"), "archive");
        assert_eq!(disk.display_description("en", "en"), None);
    }
}
