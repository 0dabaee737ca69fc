//! Adapter registry: routes disk operations to the adapter mounted under a
//! disk's `adapter` name.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use url::Url;

use filedock_core::config::{AdapterConfig, AdapterDriver, StorageConfig};
use filedock_core::error::{AppError, ErrorKind};
use filedock_core::result::AppResult;
use filedock_core::traits::storage::DiskAdapter;

use crate::providers::{LocalDiskAdapter, MemoryDiskAdapter};

/// Immutable set of mounted adapters, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    adapters: Arc<HashMap<String, Arc<dyn DiskAdapter>>>,
}

impl AdapterRegistry {
    /// Start an empty registry.
    pub fn builder() -> AdapterRegistryBuilder {
        AdapterRegistryBuilder::default()
    }

    /// Mount every adapter in the storage configuration.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let mut builder = Self::builder();
        for (name, adapter) in &config.adapters {
            builder = builder.mount(name.clone(), build_adapter(name, adapter).await?);
        }
        let registry = builder.build();
        info!(adapters = ?registry.names(), "Mounted disk adapters");
        Ok(registry)
    }

    /// The adapter mounted as `name`.
    pub fn get(&self, name: &str) -> AppResult<Arc<dyn DiskAdapter>> {
        self.adapters
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Disk adapter '{name}' is not mounted")))
    }

    /// Whether an adapter is mounted as `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.adapters.contains_key(name)
    }

    /// Public URL root of the adapter, if it is publicly exposed.
    pub fn public_root(&self, name: &str) -> Option<&Url> {
        self.adapters.get(name).and_then(|a| a.public_root())
    }

    /// Mounted adapter names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Check health of all mounted adapters.
    pub async fn health_check_all(&self) -> HashMap<String, bool> {
        let mut results = HashMap::new();
        for (name, adapter) in self.adapters.iter() {
            let healthy = adapter.health_check().await.unwrap_or(false);
            results.insert(name.clone(), healthy);
        }
        results
    }
}

/// Collects adapters before the registry is frozen.
#[derive(Debug, Default)]
pub struct AdapterRegistryBuilder {
    adapters: HashMap<String, Arc<dyn DiskAdapter>>,
}

impl AdapterRegistryBuilder {
    /// Mount an adapter under `name`, replacing any previous one.
    pub fn mount(mut self, name: impl Into<String>, adapter: Arc<dyn DiskAdapter>) -> Self {
        self.adapters.insert(name.into(), adapter);
        self
    }

    /// Freeze the registry.
    pub fn build(self) -> AdapterRegistry {
        AdapterRegistry {
            adapters: Arc::new(self.adapters),
        }
    }
}

async fn build_adapter(name: &str, config: &AdapterConfig) -> AppResult<Arc<dyn DiskAdapter>> {
    let public_root = config
        .public_url
        .as_deref()
        .map(|raw| parse_public_root(name, raw))
        .transpose()?;

    match config.driver {
        AdapterDriver::Local => {
            let root = config.root_path.as_deref().ok_or_else(|| {
                AppError::configuration(format!(
                    "storage.adapters.{name}.root_path is required for the local driver"
                ))
            })?;
            Ok(Arc::new(LocalDiskAdapter::new(root, public_root).await?))
        }
        AdapterDriver::Memory => Ok(Arc::new(MemoryDiskAdapter::new(public_root))),
    }
}

/// Public roots always end in `/` so that joined paths stay beneath them.
fn parse_public_root(name: &str, raw: &str) -> AppResult<Url> {
    let mut url = Url::parse(raw).map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("storage.adapters.{name}.public_url is not a valid URL"),
            e,
        )
    })?;
    if url.cannot_be_a_base() {
        return Err(AppError::configuration(format!(
            "storage.adapters.{name}.public_url cannot be used as a base URL"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
