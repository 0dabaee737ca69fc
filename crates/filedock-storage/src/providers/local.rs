//! Local filesystem disk adapter.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;
use url::Url;

use filedock_core::error::{AppError, ErrorKind};
use filedock_core::result::AppResult;
use filedock_core::traits::storage::{DiskAdapter, StorageObjectMeta};

/// Stores a disk's bytes under a root directory.
#[derive(Debug, Clone)]
pub struct LocalDiskAdapter {
    root: PathBuf,
    public_root: Option<Url>,
}

impl LocalDiskAdapter {
    /// Create an adapter rooted at `root_path`, creating the directory.
    pub async fn new(root_path: impl AsRef<Path>, public_root: Option<Url>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root, public_root })
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a location onto the root, refusing anything that could escape it.
    fn resolve(&self, location: &str) -> AppResult<PathBuf> {
        let relative = Path::new(location.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(AppError::validation(format!(
                        "Invalid storage location: {location}"
                    )));
                }
            }
        }
        if resolved == self.root {
            return Err(AppError::validation("Storage location is empty"));
        }
        Ok(resolved)
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

fn io_error(action: &str, location: &str, e: std::io::Error) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("Stored object not found: {location}"))
    } else {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to {action}: {location}"),
            e,
        )
    }
}

#[async_trait]
impl DiskAdapter for LocalDiskAdapter {
    fn driver(&self) -> &str {
        "local"
    }

    fn public_root(&self) -> Option<&Url> {
        self.public_root.as_ref()
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn read_bytes(&self, location: &str) -> AppResult<Bytes> {
        let path = self.resolve(location)?;
        let data = fs::read(&path)
            .await
            .map_err(|e| io_error("read", location, e))?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, location: &str, data: Bytes) -> AppResult<()> {
        let path = self.resolve(location)?;
        self.ensure_parent(&path).await?;
        fs::write(&path, &data)
            .await
            .map_err(|e| io_error("write", location, e))?;
        debug!(location, bytes = data.len(), "Wrote object");
        Ok(())
    }

    async fn delete(&self, location: &str) -> AppResult<()> {
        let path = self.resolve(location)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(location, "Deleted object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("delete", location, e)),
        }
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let from_path = self.resolve(from)?;
        let to_path = self.resolve(to)?;
        self.ensure_parent(&to_path).await?;
        fs::rename(&from_path, &to_path)
            .await
            .map_err(|e| io_error("rename", from, e))?;
        debug!(from, to, "Renamed object");
        Ok(())
    }

    async fn exists(&self, location: &str) -> AppResult<bool> {
        let path = self.resolve(location)?;
        fs::try_exists(&path)
            .await
            .map_err(|e| io_error("stat", location, e))
    }

    async fn metadata(&self, location: &str) -> AppResult<StorageObjectMeta> {
        let path = self.resolve(location)?;
        let meta = fs::metadata(&path)
            .await
            .map_err(|e| io_error("stat", location, e))?;
        Ok(StorageObjectMeta {
            location: location.to_string(),
            size_bytes: meta.len(),
            last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }
}
