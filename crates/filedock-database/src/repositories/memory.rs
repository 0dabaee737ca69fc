//! In-memory store implementing every repository trait.
//!
//! All three record sets live behind one `RwLock`, so each write sees a
//! consistent snapshot and enforces the same uniqueness and reference rules
//! as the PostgreSQL schema.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_core::types::{DiskId, FileId, FolderId};
use filedock_entity::disk::{CreateDisk, Disk};
use filedock_entity::file::{CreateFile, EntryRef, File};
use filedock_entity::folder::{CreateFolder, Folder};

use super::{DiskRepository, FileRepository, FolderRepository};

#[derive(Debug, Default)]
struct State {
    disks: HashMap<DiskId, Disk>,
    folders: HashMap<FolderId, Folder>,
    files: HashMap<FileId, File>,
}

impl State {
    fn check_disk_unique(&self, disk: &Disk) -> AppResult<()> {
        for other in self.disks.values().filter(|d| d.id != disk.id) {
            if other.slug == disk.slug {
                return Err(AppError::validation(format!(
                    "A disk with slug '{}' already exists",
                    disk.slug
                )));
            }
            for (locale, name) in disk.name.iter() {
                if other.name.get_exact(locale) == Some(name) {
                    return Err(AppError::validation(format!(
                        "A disk named '{name}' already exists for locale '{locale}'"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_file_unique(&self, file: &File) -> AppResult<()> {
        let clash = self.files.values().any(|f| {
            f.id != file.id
                && f.disk_id == file.disk_id
                && f.folder_id == file.folder_id
                && f.name == file.name
        });
        if clash {
            return Err(AppError::validation(format!(
                "A file named '{}' already exists in this folder",
                file.name
            )));
        }
        Ok(())
    }

    fn check_file_references(&self, file: &File) -> AppResult<()> {
        if !self.disks.contains_key(&file.disk_id) {
            return Err(AppError::not_found(format!("Disk {} not found", file.disk_id)));
        }
        if let Some(folder_id) = file.folder_id {
            let folder = self
                .folders
                .get(&folder_id)
                .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
            if folder.disk_id != file.disk_id {
                return Err(AppError::validation(
                    "Folder belongs to a different disk than the file",
                ));
            }
        }
        Ok(())
    }
}

/// Process-local registry store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by(|a, b| key(a).cmp(&key(b)));
    items
}

#[async_trait]
impl DiskRepository for MemoryStore {
    async fn find_by_id(&self, id: DiskId) -> AppResult<Option<Disk>> {
        Ok(self.state.read().await.disks.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Disk>> {
        let state = self.state.read().await;
        Ok(state.disks.values().find(|d| d.slug == slug).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Disk>> {
        let state = self.state.read().await;
        let disks = state.disks.values().cloned().collect();
        Ok(sorted_by(disks, |d: &Disk| d.slug.clone()))
    }

    async fn name_taken(
        &self,
        locale: &str,
        name: &str,
        exclude: Option<DiskId>,
    ) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .disks
            .values()
            .filter(|d| Some(d.id) != exclude)
            .any(|d| d.name.get_exact(locale) == Some(name)))
    }

    async fn create(&self, data: &CreateDisk) -> AppResult<Disk> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let disk = Disk {
            id: DiskId::new(),
            slug: data.slug.clone(),
            adapter: data.adapter.clone(),
            name: data.name.clone(),
            description: data.description.clone(),
            created_at: now,
            updated_at: now,
        };
        state.check_disk_unique(&disk)?;
        state.disks.insert(disk.id, disk.clone());
        Ok(disk)
    }

    async fn update(&self, disk: &Disk) -> AppResult<Disk> {
        let mut state = self.state.write().await;
        let Some(existing) = state.disks.get(&disk.id) else {
            return Err(AppError::not_found(format!("Disk {} not found", disk.id)));
        };
        let updated = Disk {
            slug: existing.slug.clone(),
            adapter: existing.adapter.clone(),
            created_at: existing.created_at,
            ..disk.clone()
        };
        state.check_disk_unique(&updated)?;
        state.disks.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: DiskId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let referenced = state.folders.values().any(|f| f.disk_id == id)
            || state.files.values().any(|f| f.disk_id == id);
        if referenced {
            return Err(AppError::validation(
                "Disk is still referenced by folders or files",
            ));
        }
        Ok(state.disks.remove(&id).is_some())
    }

    async fn usage(&self, id: DiskId) -> AppResult<(u64, u64)> {
        let state = self.state.read().await;
        let folders = state.folders.values().filter(|f| f.disk_id == id).count();
        let files = state.files.values().filter(|f| f.disk_id == id).count();
        Ok((folders as u64, files as u64))
    }
}

#[async_trait]
impl FolderRepository for MemoryStore {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.state.read().await.folders.get(&id).cloned())
    }

    async fn find_by_path(&self, disk_id: DiskId, path: &str) -> AppResult<Option<Folder>> {
        let state = self.state.read().await;
        Ok(state
            .folders
            .values()
            .find(|f| f.disk_id == disk_id && f.path == path)
            .cloned())
    }

    async fn find_roots(&self, disk_id: DiskId) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        let roots = state
            .folders
            .values()
            .filter(|f| f.disk_id == disk_id && f.parent_id.is_none())
            .cloned()
            .collect();
        Ok(sorted_by(roots, |f: &Folder| f.name.clone()))
    }

    async fn find_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        let children = state
            .folders
            .values()
            .filter(|f| f.parent_id == Some(parent_id))
            .cloned()
            .collect();
        Ok(sorted_by(children, |f: &Folder| f.name.clone()))
    }

    async fn find_by_disk(&self, disk_id: DiskId) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        let folders = state
            .folders
            .values()
            .filter(|f| f.disk_id == disk_id)
            .cloned()
            .collect();
        Ok(sorted_by(folders, |f: &Folder| f.path.clone()))
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        if !state.disks.contains_key(&data.disk_id) {
            return Err(AppError::not_found(format!("Disk {} not found", data.disk_id)));
        }
        if let Some(parent_id) = data.parent_id {
            match state.folders.get(&parent_id) {
                Some(parent) if parent.disk_id == data.disk_id => {}
                Some(_) => {
                    return Err(AppError::validation(
                        "Parent folder belongs to a different disk",
                    ));
                }
                None => {
                    return Err(AppError::not_found(format!(
                        "Parent folder {parent_id} not found"
                    )));
                }
            }
        }
        if state
            .folders
            .values()
            .any(|f| f.disk_id == data.disk_id && f.path == data.path)
        {
            return Err(AppError::validation(format!(
                "A folder at path '{}' already exists",
                data.path
            )));
        }

        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(),
            disk_id: data.disk_id,
            parent_id: data.parent_id,
            name: data.name.clone(),
            path: data.path.clone(),
            depth: data.depth,
            created_at: now,
            updated_at: now,
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn delete(&self, id: FolderId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let referenced = state.folders.values().any(|f| f.parent_id == Some(id))
            || state.files.values().any(|f| f.folder_id == Some(id));
        if referenced {
            return Err(AppError::validation(
                "Folder still contains folders or files",
            ));
        }
        Ok(state.folders.remove(&id).is_some())
    }

    async fn count_children(&self, id: FolderId) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .folders
            .values()
            .filter(|f| f.parent_id == Some(id))
            .count() as u64)
    }
}

#[async_trait]
impl FileRepository for MemoryStore {
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        Ok(self.state.read().await.files.get(&id).cloned())
    }

    async fn find_by_name(
        &self,
        disk_id: DiskId,
        folder_id: Option<FolderId>,
        name: &str,
    ) -> AppResult<Option<File>> {
        let state = self.state.read().await;
        Ok(state
            .files
            .values()
            .find(|f| f.disk_id == disk_id && f.folder_id == folder_id && f.name == name)
            .cloned())
    }

    async fn find_in_folder(
        &self,
        disk_id: DiskId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<File>> {
        let state = self.state.read().await;
        let files = state
            .files
            .values()
            .filter(|f| f.disk_id == disk_id && f.folder_id == folder_id)
            .cloned()
            .collect();
        Ok(sorted_by(files, |f: &File| f.name.clone()))
    }

    async fn find_by_entry(&self, entry: &EntryRef) -> AppResult<Vec<File>> {
        let state = self.state.read().await;
        let files = state
            .files
            .values()
            .filter(|f| f.entry.as_ref() == Some(entry))
            .cloned()
            .collect();
        Ok(sorted_by(files, |f: &File| f.name.clone()))
    }

    async fn count_by_folder(&self, disk_id: DiskId) -> AppResult<HashMap<Option<FolderId>, u64>> {
        let state = self.state.read().await;
        let mut counts = HashMap::new();
        for file in state.files.values().filter(|f| f.disk_id == disk_id) {
            *counts.entry(file.folder_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let file = File {
            id: FileId::new(),
            disk_id: data.disk_id,
            folder_id: data.folder_id,
            name: data.name.clone(),
            extension: data.extension.clone(),
            mime_type: data.mime_type.clone(),
            size_bytes: data.size_bytes,
            hash: data.hash.clone(),
            alt: data.alt.clone(),
            description: data.description.clone(),
            keywords: data.keywords.clone(),
            entry: data.entry.clone(),
            last_modified: now,
            created_at: now,
            updated_at: now,
        };
        state.check_file_references(&file)?;
        state.check_file_unique(&file)?;
        state.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn update(&self, file: &File) -> AppResult<File> {
        let mut state = self.state.write().await;
        let Some(existing) = state.files.get(&file.id) else {
            return Err(AppError::not_found(format!("File {} not found", file.id)));
        };
        // content-derived columns are never rewritten
        let updated = File {
            disk_id: existing.disk_id,
            extension: existing.extension.clone(),
            mime_type: existing.mime_type.clone(),
            size_bytes: existing.size_bytes,
            hash: existing.hash.clone(),
            last_modified: existing.last_modified,
            created_at: existing.created_at,
            ..file.clone()
        };
        state.check_file_references(&updated)?;
        state.check_file_unique(&updated)?;
        state.files.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: FileId) -> AppResult<Option<File>> {
        Ok(self.state.write().await.files.remove(&id))
    }
}
