//! In-memory disk adapter.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;
use url::Url;

use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_core::traits::storage::{DiskAdapter, StorageObjectMeta};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    last_modified: DateTime<Utc>,
}

/// Keeps objects in a concurrent map; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryDiskAdapter {
    objects: DashMap<String, StoredObject>,
    public_root: Option<Url>,
}

impl MemoryDiskAdapter {
    /// Create an empty adapter.
    pub fn new(public_root: Option<Url>) -> Self {
        Self {
            objects: DashMap::new(),
            public_root,
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn key(location: &str) -> String {
    location.trim_start_matches('/').to_string()
}

#[async_trait]
impl DiskAdapter for MemoryDiskAdapter {
    fn driver(&self) -> &str {
        "memory"
    }

    fn public_root(&self) -> Option<&Url> {
        self.public_root.as_ref()
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read_bytes(&self, location: &str) -> AppResult<Bytes> {
        self.objects
            .get(&key(location))
            .map(|o| o.data.clone())
            .ok_or_else(|| AppError::not_found(format!("Stored object not found: {location}")))
    }

    async fn write(&self, location: &str, data: Bytes) -> AppResult<()> {
        debug!(location, bytes = data.len(), "Stored object in memory");
        self.objects.insert(
            key(location),
            StoredObject {
                data,
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, location: &str) -> AppResult<()> {
        self.objects.remove(&key(location));
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let (_, object) = self
            .objects
            .remove(&key(from))
            .ok_or_else(|| AppError::not_found(format!("Stored object not found: {from}")))?;
        self.objects.insert(key(to), object);
        Ok(())
    }

    async fn exists(&self, location: &str) -> AppResult<bool> {
        Ok(self.objects.contains_key(&key(location)))
    }

    async fn metadata(&self, location: &str) -> AppResult<StorageObjectMeta> {
        let object = self
            .objects
            .get(&key(location))
            .ok_or_else(|| AppError::not_found(format!("Stored object not found: {location}")))?;
        Ok(StorageObjectMeta {
            location: location.to_string(),
            size_bytes: object.data.len() as u64,
            last_modified: Some(object.last_modified),
        })
    }
}
