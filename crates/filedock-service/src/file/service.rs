//! File registration, metadata updates, deletion and lookups.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{error, info, warn};

use filedock_core::config::StorageConfig;
use filedock_core::error::AppError;
use filedock_core::events::{EventBus, FileEvent};
use filedock_core::result::AppResult;
use filedock_core::types::{DiskId, FileId, FolderId};
use filedock_database::repositories::{DiskRepository, FileRepository, FolderRepository};
use filedock_entity::disk::Disk;
use filedock_entity::file::{CreateFile, EntryRef, File};
use filedock_entity::folder::{Folder, validate_name};
use filedock_storage::{AdapterRegistry, LocationGuard};

use super::entry::{Entry, EntryResolverRegistry};
use super::inspect::ContentInfo;
use super::request::{FileMetadataPatch, RegisterFileRequest, non_blank, normalize_keywords};
use super::resolved::ResolvedFile;

/// Canonical record keeper for uploaded files.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    /// File repository.
    file_repo: Arc<dyn FileRepository>,
    /// Folder repository.
    folder_repo: Arc<dyn FolderRepository>,
    /// Disk repository.
    disk_repo: Arc<dyn DiskRepository>,
    /// Mounted adapters.
    adapters: AdapterRegistry,
    /// Resolvers for attached entries.
    entries: Arc<EntryResolverRegistry>,
    /// Event bus.
    events: EventBus,
    /// Largest accepted content length.
    max_upload_size_bytes: u64,
}

impl FileRegistry {
    /// Creates a new file registry.
    pub fn new(
        file_repo: Arc<dyn FileRepository>,
        folder_repo: Arc<dyn FolderRepository>,
        disk_repo: Arc<dyn DiskRepository>,
        adapters: AdapterRegistry,
        events: EventBus,
        config: &StorageConfig,
    ) -> Self {
        Self {
            file_repo,
            folder_repo,
            disk_repo,
            adapters,
            entries: Arc::new(EntryResolverRegistry::new()),
            events,
            max_upload_size_bytes: config.max_upload_size_bytes,
        }
    }

    /// Use `entries` to resolve attached entries.
    pub fn with_entry_resolvers(mut self, entries: EntryResolverRegistry) -> Self {
        self.entries = Arc::new(entries);
        self
    }

    /// Registers content: records the file, then hands the bytes to the
    /// disk's adapter.
    pub async fn register_file(&self, req: RegisterFileRequest) -> AppResult<File> {
        validate_name("File", &req.name)?;

        if req.content.len() as u64 > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.max_upload_size_bytes
            )));
        }

        let disk = self.disk(req.disk_id).await?;
        let folder = match req.folder_id {
            Some(folder_id) => Some(self.folder_on(&disk, folder_id).await?),
            None => None,
        };
        self.ensure_name_free(&disk, folder.as_ref(), &req.name, None)
            .await?;
        let adapter = self.adapters.get(&disk.adapter)?;

        let info = ContentInfo::inspect(&req.name, &req.content);
        let file = self
            .file_repo
            .create(&CreateFile {
                disk_id: disk.id,
                folder_id: folder.as_ref().map(|f| f.id),
                name: req.name,
                extension: info.extension,
                mime_type: info.mime_type,
                size_bytes: info.size_bytes,
                hash: info.hash,
                alt: non_blank(req.alt.as_deref()),
                description: non_blank(req.description.as_deref()),
                keywords: normalize_keywords(&req.keywords),
                entry: req.entry,
            })
            .await?;

        let location = file.location(folder.as_ref());
        if let Err(e) = adapter.write(&location, req.content).await {
            warn!(file_id = %file.id, location = %location, error = %e, "Adapter write failed, removing record");
            if let Err(cleanup) = self.file_repo.delete(file.id).await {
                error!(file_id = %file.id, error = %cleanup, "Failed to remove record after write failure");
            }
            return Err(e);
        }

        self.events.publish(FileEvent::Registered {
            file_id: file.id,
            disk_id: file.disk_id,
            folder_id: file.folder_id,
            name: file.name.clone(),
            size_bytes: file.size_bytes,
            mime_type: file.mime_type.clone(),
            hash: file.hash.clone(),
        });
        info!(
            file_id = %file.id,
            disk = %disk.slug,
            location = %location,
            size = file.size_bytes,
            mime_type = %file.mime_type,
            "File registered"
        );

        Ok(file)
    }

    /// Applies a partial metadata update. Renames and moves relocate the
    /// bytes; the record is restored if the adapter refuses.
    pub async fn update_metadata(&self, file_id: FileId, patch: FileMetadataPatch) -> AppResult<File> {
        let immutable = patch.immutable_fields();
        if !immutable.is_empty() {
            return Err(AppError::validation(format!(
                "Immutable file fields cannot be changed: {}",
                immutable.join(", ")
            )));
        }

        let current = self.get_file(file_id).await?;
        let disk = self.disk(current.disk_id).await?;
        let old_folder = self.load_folder(current.folder_id).await?;

        let mut updated = current.clone();
        let mut changed_fields: Vec<String> = Vec::new();

        if let Some(name) = &patch.name {
            validate_name("File", name)?;
            if *name != updated.name {
                updated.name = name.clone();
                changed_fields.push("name".into());
            }
        }

        let new_folder = match patch.folder_id {
            Some(Some(folder_id)) => Some(self.folder_on(&disk, folder_id).await?),
            Some(None) => None,
            None => old_folder.clone(),
        };
        let new_folder_id = new_folder.as_ref().map(|f| f.id);
        if new_folder_id != updated.folder_id {
            updated.folder_id = new_folder_id;
            changed_fields.push("folder_id".into());
        }

        if let Some(alt) = &patch.alt {
            let alt = non_blank(Some(alt.as_str()));
            if alt != updated.alt {
                updated.alt = alt;
                changed_fields.push("alt".into());
            }
        }

        if let Some(description) = &patch.description {
            let description = non_blank(Some(description.as_str()));
            if description != updated.description {
                updated.description = description;
                changed_fields.push("description".into());
            }
        }

        if let Some(keywords) = &patch.keywords {
            let keywords = normalize_keywords(keywords);
            if keywords != updated.keywords {
                updated.keywords = keywords;
                changed_fields.push("keywords".into());
            }
        }

        if let Some(entry) = &patch.entry {
            if *entry != updated.entry {
                updated.entry = entry.clone();
                changed_fields.push("entry".into());
            }
        }

        if changed_fields.is_empty() {
            return Ok(current);
        }

        let from = current.location(old_folder.as_ref());
        let to = updated.location(new_folder.as_ref());
        let adapter = if from != to {
            self.ensure_name_free(&disk, new_folder.as_ref(), &updated.name, Some(file_id))
                .await?;
            Some(self.adapters.get(&disk.adapter)?)
        } else {
            None
        };

        let saved = self.file_repo.update(&updated).await?;

        if let Some(adapter) = adapter {
            if let Err(e) = adapter.rename(&from, &to).await {
                warn!(file_id = %file_id, from = %from, to = %to, error = %e, "Adapter rename failed, restoring record");
                if let Err(revert) = self.file_repo.update(&current).await {
                    error!(file_id = %file_id, error = %revert, "Failed to restore record after rename failure");
                }
                return Err(e);
            }
        }

        info!(file_id = %file_id, fields = ?changed_fields, "File metadata updated");
        self.events.publish(FileEvent::Updated {
            file_id,
            changed_fields,
        });
        Ok(saved)
    }

    /// Removes the record and announces the location for reclamation.
    /// Unknown IDs are a no-op.
    pub async fn delete_file(&self, file_id: FileId) -> AppResult<()> {
        let Some(file) = self.file_repo.find_by_id(file_id).await? else {
            return Ok(());
        };
        let disk = self.disk(file.disk_id).await?;
        let folder = self.load_folder(file.folder_id).await?;
        let location = file.location(folder.as_ref());

        // a concurrent delete may have won; only the winner announces it
        if self.file_repo.delete(file_id).await?.is_none() {
            return Ok(());
        }

        self.events.publish(FileEvent::Deleted {
            file_id,
            disk_id: disk.id,
            adapter: disk.adapter.clone(),
            location: location.clone(),
            name: file.name.clone(),
        });
        info!(file_id = %file_id, disk = %disk.slug, location = %location, "File deleted");
        Ok(())
    }

    /// Gets a file by ID.
    pub async fn get_file(&self, file_id: FileId) -> AppResult<File> {
        self.file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Gets a file with its disk and folder.
    pub async fn resolve(&self, file_id: FileId) -> AppResult<ResolvedFile> {
        let file = self.get_file(file_id).await?;
        let disk = self.disk(file.disk_id).await?;
        let folder = self.load_folder(file.folder_id).await?;
        Ok(ResolvedFile { file, disk, folder })
    }

    /// Finds a file by disk slug and adapter-relative location, the inverse
    /// of the stream and download routes.
    pub async fn resolve_location(&self, disk_slug: &str, location: &str) -> AppResult<ResolvedFile> {
        let disk = self
            .disk_repo
            .find_by_slug(disk_slug)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Disk '{disk_slug}' not found")))?;

        let location = location.trim_matches('/');
        let (folder, name) = match location.rsplit_once('/') {
            Some((folder_path, name)) => {
                let path = format!("/{folder_path}");
                let folder = self
                    .folder_repo
                    .find_by_path(disk.id, &path)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Folder '{path}' not found")))?;
                (Some(folder), name)
            }
            None => (None, location),
        };

        let file = self
            .file_repo
            .find_by_name(disk.id, folder.as_ref().map(|f| f.id), name)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("File '{location}' not found on disk '{disk_slug}'"))
            })?;
        Ok(ResolvedFile { file, disk, folder })
    }

    /// Whether a live file on any disk mounted on `adapter` is stored at
    /// `location`.
    pub async fn location_in_use(&self, adapter: &str, location: &str) -> AppResult<bool> {
        let location = location.trim_matches('/');
        let (folder_path, name) = match location.rsplit_once('/') {
            Some((folder_path, name)) => (Some(format!("/{folder_path}")), name),
            None => (None, location),
        };

        for disk in self.disk_repo.find_all().await? {
            if disk.adapter != adapter {
                continue;
            }
            let folder_id = match &folder_path {
                Some(path) => match self.folder_repo.find_by_path(disk.id, path).await? {
                    Some(folder) => Some(folder.id),
                    None => continue,
                },
                None => None,
            };
            if self
                .file_repo
                .find_by_name(disk.id, folder_id, name)
                .await?
                .is_some()
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Lists files in a folder (or the disk root) ordered by name.
    pub async fn list_files(&self, disk_id: DiskId, folder_id: Option<FolderId>) -> AppResult<Vec<File>> {
        let disk = self.disk(disk_id).await?;
        if let Some(folder_id) = folder_id {
            self.folder_on(&disk, folder_id).await?;
        }
        self.file_repo.find_in_folder(disk_id, folder_id).await
    }

    /// Files attached to an entry.
    pub async fn attached_files(&self, entry: &EntryRef) -> AppResult<Vec<File>> {
        self.file_repo.find_by_entry(entry).await
    }

    /// Reads the stored bytes of a file.
    pub async fn read_content(&self, file_id: FileId) -> AppResult<(ResolvedFile, Bytes)> {
        let resolved = self.resolve(file_id).await?;
        let adapter = self.adapters.get(&resolved.disk.adapter)?;
        let content = adapter.read_bytes(&resolved.location()).await?;
        Ok((resolved, content))
    }

    /// The entry a file is attached to, via the resolver for its type.
    pub async fn get_entry(&self, file: &File) -> AppResult<Option<Entry>> {
        match &file.entry {
            Some(reference) => self.entries.resolve(reference).await,
            None => Ok(None),
        }
    }

    async fn disk(&self, disk_id: DiskId) -> AppResult<Disk> {
        self.disk_repo
            .find_by_id(disk_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Disk {disk_id} not found")))
    }

    async fn load_folder(&self, folder_id: Option<FolderId>) -> AppResult<Option<Folder>> {
        match folder_id {
            Some(id) => Ok(Some(self.folder_repo.find_by_id(id).await?.ok_or_else(|| {
                AppError::internal(format!("Folder {id} referenced by a file is missing"))
            })?)),
            None => Ok(None),
        }
    }

    async fn folder_on(&self, disk: &Disk, folder_id: FolderId) -> AppResult<Folder> {
        let folder = self
            .folder_repo
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
        if folder.disk_id != disk.id {
            return Err(AppError::validation(format!(
                "Folder {folder_id} does not belong to disk '{}'",
                disk.slug
            )));
        }
        Ok(folder)
    }

    async fn ensure_name_free(
        &self,
        disk: &Disk,
        folder: Option<&Folder>,
        name: &str,
        exclude: Option<FileId>,
    ) -> AppResult<()> {
        let existing = self
            .file_repo
            .find_by_name(disk.id, folder.map(|f| f.id), name)
            .await?;
        if existing.is_some_and(|f| Some(f.id) != exclude) {
            return Err(AppError::validation(format!(
                "A file named '{name}' already exists in this folder"
            )));
        }

        let sibling_path = match folder {
            Some(folder) => folder.child_path(name),
            None => format!("/{name}"),
        };
        if self
            .folder_repo
            .find_by_path(disk.id, &sibling_path)
            .await?
            .is_some()
        {
            return Err(AppError::validation(format!(
                "A folder named '{name}' already exists at this level"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl LocationGuard for FileRegistry {
    async fn in_use(&self, adapter: &str, location: &str) -> AppResult<bool> {
        self.location_in_use(adapter, location).await
    }
}
