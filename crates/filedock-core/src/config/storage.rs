//! Disk adapter configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Maximum accepted content length in bytes (default 5 GB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Adapters mounted by name; disks reference these names.
    #[serde(default = "default_adapters")]
    pub adapters: BTreeMap<String, AdapterConfig>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: default_max_upload(),
            adapters: default_adapters(),
        }
    }
}

/// Backend driver behind a mounted adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterDriver {
    /// Local filesystem rooted at `root_path`.
    Local,
    /// Process memory.
    Memory,
}

/// One mounted adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Backend driver.
    pub driver: AdapterDriver,
    /// Root directory for the local driver.
    #[serde(default)]
    pub root_path: Option<String>,
    /// Public URL root; adapters without one are private.
    #[serde(default)]
    pub public_url: Option<String>,
}

/// A disk created at bootstrap when no disk with its slug exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskSeed {
    /// Display name in the default locale.
    pub name: String,
    /// Unique slug.
    pub slug: String,
    /// Mounted adapter name.
    pub adapter: String,
    /// Optional description in the default locale.
    #[serde(default)]
    pub description: Option<String>,
}

fn default_max_upload() -> u64 {
    5_368_709_120 // 5 GB
}

fn default_adapters() -> BTreeMap<String, AdapterConfig> {
    let mut adapters = BTreeMap::new();
    adapters.insert(
        "local".to_string(),
        AdapterConfig {
            driver: AdapterDriver::Local,
            root_path: Some("./data/storage/local".to_string()),
            public_url: None,
        },
    );
    adapters
}
