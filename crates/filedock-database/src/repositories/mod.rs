//! Repository traits and their PostgreSQL and in-memory implementations.
//!
//! Services only see the traits. Uniqueness rules (disk slug, disk name per
//! locale, folder path per disk, file name per folder) are enforced by the
//! implementation at write time and surface as `Validation` errors, so
//! concurrent writers cannot both win a race.

pub mod memory;
pub mod postgres;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use filedock_core::config::{DatabaseBackend, DatabaseConfig};
use filedock_core::result::AppResult;
use filedock_core::types::{DiskId, FileId, FolderId};
use filedock_entity::disk::{CreateDisk, Disk};
use filedock_entity::file::{CreateFile, EntryRef, File};
use filedock_entity::folder::{CreateFolder, Folder};

use crate::connection::DatabasePool;

pub use memory::MemoryStore;
pub use postgres::{PgDiskRepository, PgFileRepository, PgFolderRepository};

/// Persistence for disk records and their translations.
#[async_trait]
pub trait DiskRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a disk by ID.
    async fn find_by_id(&self, id: DiskId) -> AppResult<Option<Disk>>;

    /// Find a disk by slug.
    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Disk>>;

    /// List all disks ordered by slug.
    async fn find_all(&self) -> AppResult<Vec<Disk>>;

    /// Whether another disk already uses `name` in `locale`.
    async fn name_taken(&self, locale: &str, name: &str, exclude: Option<DiskId>)
    -> AppResult<bool>;

    /// Insert a disk with its translations.
    async fn create(&self, data: &CreateDisk) -> AppResult<Disk>;

    /// Replace a disk's translations.
    async fn update(&self, disk: &Disk) -> AppResult<Disk>;

    /// Delete a disk. Returns `true` if a record was removed.
    async fn delete(&self, id: DiskId) -> AppResult<bool>;

    /// Number of folders and files that reference the disk.
    async fn usage(&self, id: DiskId) -> AppResult<(u64, u64)>;
}

/// Persistence for folder records.
#[async_trait]
pub trait FolderRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a folder by ID.
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Find a folder by disk and materialized path.
    async fn find_by_path(&self, disk_id: DiskId, path: &str) -> AppResult<Option<Folder>>;

    /// Root folders of a disk ordered by name.
    async fn find_roots(&self, disk_id: DiskId) -> AppResult<Vec<Folder>>;

    /// Direct children of a folder ordered by name.
    async fn find_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>>;

    /// Every folder of a disk ordered by path.
    async fn find_by_disk(&self, disk_id: DiskId) -> AppResult<Vec<Folder>>;

    /// Insert a folder.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Delete a folder. Returns `true` if a record was removed.
    async fn delete(&self, id: FolderId) -> AppResult<bool>;

    /// Number of direct child folders.
    async fn count_children(&self, id: FolderId) -> AppResult<u64>;
}

/// Persistence for file records.
#[async_trait]
pub trait FileRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a file by ID.
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>>;

    /// Find the file named `name` in a folder (or the disk root).
    async fn find_by_name(
        &self,
        disk_id: DiskId,
        folder_id: Option<FolderId>,
        name: &str,
    ) -> AppResult<Option<File>>;

    /// Files in a folder (or the disk root) ordered by name.
    async fn find_in_folder(
        &self,
        disk_id: DiskId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<File>>;

    /// Files attached to an entry ordered by name.
    async fn find_by_entry(&self, entry: &EntryRef) -> AppResult<Vec<File>>;

    /// File counts per folder of a disk; `None` is the disk root.
    async fn count_by_folder(&self, disk_id: DiskId) -> AppResult<HashMap<Option<FolderId>, u64>>;

    /// Insert a file record.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    /// Persist the mutable fields of a file record.
    async fn update(&self, file: &File) -> AppResult<File>;

    /// Delete a file record, returning it if it existed.
    async fn delete(&self, id: FileId) -> AppResult<Option<File>>;
}

/// The repositories a registry needs, bound to one backend.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Disk repository.
    pub disks: Arc<dyn DiskRepository>,
    /// Folder repository.
    pub folders: Arc<dyn FolderRepository>,
    /// File repository.
    pub files: Arc<dyn FileRepository>,
}

impl Repositories {
    /// Repositories sharing one in-memory store.
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            disks: store.clone(),
            folders: store.clone(),
            files: store,
        }
    }

    /// Repositories over a PostgreSQL pool.
    pub fn postgres(pool: &DatabasePool) -> Self {
        let pool = pool.pool().clone();
        Self {
            disks: Arc::new(PgDiskRepository::new(pool.clone())),
            folders: Arc::new(PgFolderRepository::new(pool.clone())),
            files: Arc::new(PgFileRepository::new(pool)),
        }
    }

    /// Build the configured backend, connecting and migrating if needed.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            DatabaseBackend::Memory => Ok(Self::memory()),
            DatabaseBackend::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                Ok(Self::postgres(&pool))
            }
        }
    }
}
