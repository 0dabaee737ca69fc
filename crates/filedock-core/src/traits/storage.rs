//! Disk adapter trait for pluggable byte storage backends.

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::result::AppResult;

/// Metadata about a stored object.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StorageObjectMeta {
    /// Adapter-relative location.
    pub location: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last modified timestamp (if the backend tracks one).
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// Trait for the backends that physically hold a disk's bytes.
///
/// The registry never performs file I/O itself; it computes locations
/// (`folder/path/name.ext`) and delegates to the adapter mounted under the
/// disk's `adapter` name. Locations are always relative and use `/`.
#[async_trait]
pub trait DiskAdapter: Send + Sync + std::fmt::Debug + 'static {
    /// Return the driver name (e.g., "local", "memory").
    fn driver(&self) -> &str;

    /// Public URL root when the adapter's objects are directly reachable.
    fn public_root(&self) -> Option<&Url>;

    /// Check whether the backend is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read an object into memory.
    async fn read_bytes(&self, location: &str) -> AppResult<Bytes>;

    /// Write bytes, replacing any existing object at the location.
    async fn write(&self, location: &str, data: Bytes) -> AppResult<()>;

    /// Delete an object. Deleting a missing object succeeds.
    async fn delete(&self, location: &str) -> AppResult<()>;

    /// Move an object to a new location.
    async fn rename(&self, from: &str, to: &str) -> AppResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, location: &str) -> AppResult<bool>;

    /// Get metadata about an object.
    async fn metadata(&self, location: &str) -> AppResult<StorageObjectMeta>;
}
