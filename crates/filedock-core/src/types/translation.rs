//! Per-locale values for translatable fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A translatable string: locale code → value.
///
/// Lookup order is requested locale, then fallback locale, then the value
/// of the lexicographically first locale so that a record with any
/// translation always renders something.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations(BTreeMap<String, String>);

impl Translations {
    /// Create an empty set of translations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create translations holding a single locale.
    pub fn single(locale: impl Into<String>, value: impl Into<String>) -> Self {
        let mut translations = Self::new();
        translations.set(locale, value);
        translations
    }

    /// Set (or replace) the value for a locale. Blank values remove it.
    pub fn set(&mut self, locale: impl Into<String>, value: impl Into<String>) {
        let locale = normalize_locale(&locale.into());
        let value = value.into().trim().to_string();
        if value.is_empty() {
            self.0.remove(&locale);
        } else {
            self.0.insert(locale, value);
        }
    }

    /// Exact value for a locale, without fallback.
    pub fn get_exact(&self, locale: &str) -> Option<&str> {
        self.0.get(&normalize_locale(locale)).map(String::as_str)
    }

    /// Value for `locale`, falling back to `fallback`, then to any value.
    pub fn get(&self, locale: &str, fallback: &str) -> Option<&str> {
        self.get_exact(locale)
            .or_else(|| self.get_exact(fallback))
            .or_else(|| self.0.values().next().map(String::as_str))
    }

    /// Merge `other` into `self`, replacing values locale by locale.
    pub fn merge(&mut self, other: &Translations) {
        for (locale, value) in other.iter() {
            self.set(locale, value);
        }
    }

    /// Iterate over `(locale, value)` pairs in locale order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    /// Whether no locale has a value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of locales with a value.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<L: Into<String>, V: Into<String>> FromIterator<(L, V)> for Translations {
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        let mut translations = Self::new();
        for (locale, value) in iter {
            translations.set(locale, value);
        }
        translations
    }
}

/// Locale codes compare case-insensitively with `-` and `_` equivalent.
fn normalize_locale(locale: &str) -> String {
    locale.trim().to_lowercase().replace('_', "-")
}
