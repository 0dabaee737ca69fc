//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use filedock_core::config::AppConfig;
use filedock_core::error::AppError;
use filedock_core::events::EventBus;
use filedock_core::result::AppResult;
use filedock_core::traits::storage::{DiskAdapter, StorageObjectMeta};
use filedock_database::repositories::Repositories;
use filedock_entity::disk::Disk;
use filedock_service::{CreateDiskRequest, FileDock};
use filedock_storage::AdapterRegistry;
use filedock_storage::providers::MemoryDiskAdapter;

/// Memory adapter whose writes and renames can be made to fail.
#[derive(Debug)]
pub struct FlakyAdapter {
    inner: MemoryDiskAdapter,
    failing: AtomicBool,
}

impl FlakyAdapter {
    pub fn new() -> Self {
        Self {
            inner: MemoryDiskAdapter::new(None),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::storage("backend unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl DiskAdapter for FlakyAdapter {
    fn driver(&self) -> &str {
        "flaky"
    }

    fn public_root(&self) -> Option<&Url> {
        None
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.failing.load(Ordering::SeqCst))
    }

    async fn read_bytes(&self, location: &str) -> AppResult<Bytes> {
        self.inner.read_bytes(location).await
    }

    async fn write(&self, location: &str, data: Bytes) -> AppResult<()> {
        self.check()?;
        self.inner.write(location, data).await
    }

    async fn delete(&self, location: &str) -> AppResult<()> {
        self.inner.delete(location).await
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        self.check()?;
        self.inner.rename(from, to).await
    }

    async fn exists(&self, location: &str) -> AppResult<bool> {
        self.inner.exists(location).await
    }

    async fn metadata(&self, location: &str) -> AppResult<StorageObjectMeta> {
        self.inner.metadata(location).await
    }
}

/// A memory-backed registry with three mounted adapters:
/// `local` (private), `cdn` (public) and `flaky`.
pub struct TestDock {
    pub dock: FileDock,
    pub local: Arc<MemoryDiskAdapter>,
    pub cdn: Arc<MemoryDiskAdapter>,
    pub flaky: Arc<FlakyAdapter>,
    /// Disk `local` on the `local` adapter.
    pub disk: Disk,
}

impl TestDock {
    pub async fn new() -> Self {
        let local = Arc::new(MemoryDiskAdapter::new(None));
        let cdn = Arc::new(MemoryDiskAdapter::new(Some(
            Url::parse("https://cdn.example.com/media/").expect("url"),
        )));
        let flaky = Arc::new(FlakyAdapter::new());

        let adapters = AdapterRegistry::builder()
            .mount("local", local.clone())
            .mount("cdn", cdn.clone())
            .mount("flaky", flaky.clone())
            .build();

        let dock = FileDock::new(
            AppConfig::default(),
            Repositories::memory(),
            adapters,
            EventBus::new(64),
        )
        .expect("dock");

        let disk = dock
            .disks
            .create_disk(CreateDiskRequest::new("en", "Local", "local", "local"))
            .await
            .expect("create disk");

        Self {
            dock,
            local,
            cdn,
            flaky,
            disk,
        }
    }

    /// Create another disk on `adapter`.
    pub async fn disk_on(&self, name: &str, slug: &str, adapter: &str) -> Disk {
        self.dock
            .disks
            .create_disk(CreateDiskRequest::new("en", name, slug, adapter))
            .await
            .expect("create disk")
    }
}
