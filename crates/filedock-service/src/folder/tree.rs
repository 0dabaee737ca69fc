//! Folder tree building and breadcrumbs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_core::types::{DiskId, FolderId};
use filedock_database::repositories::{DiskRepository, FileRepository, FolderRepository};
use filedock_entity::folder::{Folder, FolderNode, FolderTree};

/// Builds folder trees and resolves ancestry.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Folder repository.
    folder_repo: Arc<dyn FolderRepository>,
    /// Disk repository.
    disk_repo: Arc<dyn DiskRepository>,
    /// File repository.
    file_repo: Arc<dyn FileRepository>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(
        folder_repo: Arc<dyn FolderRepository>,
        disk_repo: Arc<dyn DiskRepository>,
        file_repo: Arc<dyn FileRepository>,
    ) -> Self {
        Self {
            folder_repo,
            disk_repo,
            file_repo,
        }
    }

    /// Builds the complete folder tree of a disk with per-node counts.
    pub async fn get_tree(&self, disk_id: DiskId) -> AppResult<FolderTree> {
        if self.disk_repo.find_by_id(disk_id).await?.is_none() {
            return Err(AppError::not_found(format!("Disk {disk_id} not found")));
        }

        let folders = self.folder_repo.find_by_disk(disk_id).await?;
        let file_counts = self.file_repo.count_by_folder(disk_id).await?;

        let mut by_parent: HashMap<Option<FolderId>, Vec<&Folder>> = HashMap::new();
        for folder in &folders {
            by_parent.entry(folder.parent_id).or_default().push(folder);
        }
        for siblings in by_parent.values_mut() {
            siblings.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let mut tree = FolderTree::empty(disk_id);
        tree.roots = build_level(None, &by_parent, &file_counts);
        tree.root_file_count = file_counts.get(&None).copied().unwrap_or(0);
        tree.total_folders = folders.len() as u64;
        Ok(tree)
    }

    /// Root-first ancestry of a folder, ending with the folder itself.
    pub async fn breadcrumbs(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        let mut current = self
            .folder_repo
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;

        let mut seen = HashSet::from([current.id]);
        let mut trail = Vec::new();
        while let Some(parent_id) = current.parent_id {
            if !seen.insert(parent_id) {
                break;
            }
            let Some(parent) = self.folder_repo.find_by_id(parent_id).await? else {
                break;
            };
            trail.push(std::mem::replace(&mut current, parent));
        }
        trail.push(current);
        trail.reverse();
        Ok(trail)
    }
}

fn build_level(
    parent: Option<FolderId>,
    by_parent: &HashMap<Option<FolderId>, Vec<&Folder>>,
    file_counts: &HashMap<Option<FolderId>, u64>,
) -> Vec<FolderNode> {
    by_parent
        .get(&parent)
        .map(|children| {
            children
                .iter()
                .map(|folder| {
                    let children = build_level(Some(folder.id), by_parent, file_counts);
                    FolderNode {
                        id: folder.id,
                        name: folder.name.clone(),
                        path: folder.path.clone(),
                        depth: folder.depth,
                        child_count: children.len() as u64,
                        file_count: file_counts.get(&Some(folder.id)).copied().unwrap_or(0),
                        children,
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}
