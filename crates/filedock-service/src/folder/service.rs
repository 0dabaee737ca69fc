//! Folder CRUD operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use filedock_core::error::AppError;
use filedock_core::events::{EventBus, FolderEvent};
use filedock_core::result::AppResult;
use filedock_core::types::{DiskId, FolderId};
use filedock_database::repositories::{DiskRepository, FileRepository, FolderRepository};
use filedock_entity::folder::{CreateFolder, Folder, validate_name};

/// Manages folder CRUD operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder repository.
    folder_repo: Arc<dyn FolderRepository>,
    /// Disk repository.
    disk_repo: Arc<dyn DiskRepository>,
    /// File repository.
    file_repo: Arc<dyn FileRepository>,
    /// Event bus.
    events: EventBus,
}

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Owning disk.
    pub disk_id: DiskId,
    /// Parent folder ID (None for root-level).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folder_repo: Arc<dyn FolderRepository>,
        disk_repo: Arc<dyn DiskRepository>,
        file_repo: Arc<dyn FileRepository>,
        events: EventBus,
    ) -> Self {
        Self {
            folder_repo,
            disk_repo,
            file_repo,
            events,
        }
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: FolderId) -> AppResult<Folder> {
        self.folder_repo
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Lists root folders of a disk.
    pub async fn list_roots(&self, disk_id: DiskId) -> AppResult<Vec<Folder>> {
        if self.disk_repo.find_by_id(disk_id).await?.is_none() {
            return Err(AppError::not_found(format!("Disk {disk_id} not found")));
        }
        self.folder_repo.find_roots(disk_id).await
    }

    /// Lists children of a folder ordered by name.
    pub async fn list_children(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        self.get_folder(folder_id).await?;
        self.folder_repo.find_children(folder_id).await
    }

    /// Creates a new folder.
    pub async fn create_folder(&self, req: CreateFolderRequest) -> AppResult<Folder> {
        validate_name("Folder", &req.name)?;

        if self.disk_repo.find_by_id(req.disk_id).await?.is_none() {
            return Err(AppError::not_found(format!("Disk {} not found", req.disk_id)));
        }

        let (path, depth) = match req.parent_id {
            Some(parent_id) => {
                let parent = self.folder_repo.find_by_id(parent_id).await?.ok_or_else(|| {
                    AppError::not_found(format!("Parent folder {parent_id} not found"))
                })?;
                if parent.disk_id != req.disk_id {
                    return Err(AppError::validation(
                        "Parent folder belongs to a different disk",
                    ));
                }
                (parent.child_path(&req.name), parent.depth + 1)
            }
            None => (format!("/{}", req.name), 0),
        };

        if self
            .folder_repo
            .find_by_path(req.disk_id, &path)
            .await?
            .is_some()
        {
            return Err(AppError::validation(format!(
                "A folder at path '{path}' already exists"
            )));
        }

        // files and folders share the adapter namespace
        if self
            .file_repo
            .find_by_name(req.disk_id, req.parent_id, &req.name)
            .await?
            .is_some()
        {
            return Err(AppError::validation(format!(
                "A file named '{}' already exists at this level",
                req.name
            )));
        }

        let folder = self
            .folder_repo
            .create(&CreateFolder {
                disk_id: req.disk_id,
                parent_id: req.parent_id,
                name: req.name,
                path,
                depth,
            })
            .await?;

        self.events.publish(FolderEvent::Created {
            folder_id: folder.id,
            disk_id: folder.disk_id,
            path: folder.path.clone(),
        });
        info!(folder_id = %folder.id, disk_id = %folder.disk_id, path = %folder.path, "Folder created");

        Ok(folder)
    }

    /// Deletes an empty folder. Unknown IDs are a no-op.
    pub async fn delete_folder(&self, folder_id: FolderId) -> AppResult<()> {
        let Some(folder) = self.folder_repo.find_by_id(folder_id).await? else {
            return Ok(());
        };

        if self.folder_repo.count_children(folder_id).await? > 0 {
            return Err(AppError::validation(format!(
                "Folder '{}' still contains folders",
                folder.path
            )));
        }
        if !self
            .file_repo
            .find_in_folder(folder.disk_id, Some(folder_id))
            .await?
            .is_empty()
        {
            return Err(AppError::validation(format!(
                "Folder '{}' still contains files",
                folder.path
            )));
        }

        if self.folder_repo.delete(folder_id).await? {
            self.events.publish(FolderEvent::Deleted {
                folder_id,
                disk_id: folder.disk_id,
                path: folder.path.clone(),
            });
            info!(folder_id = %folder_id, path = %folder.path, "Folder deleted");
        }
        Ok(())
    }
}
