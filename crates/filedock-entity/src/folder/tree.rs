//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use filedock_core::types::{DiskId, FolderId};

/// A node in a folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Full path.
    pub path: String,
    /// Depth level.
    pub depth: i32,
    /// Number of child folders.
    pub child_count: u64,
    /// Number of files directly in this folder.
    pub file_count: u64,
    /// Child folder nodes, ordered by name.
    pub children: Vec<FolderNode>,
}

/// The complete folder tree of one disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderTree {
    /// The disk the tree belongs to.
    pub disk_id: DiskId,
    /// Root folders, ordered by name.
    pub roots: Vec<FolderNode>,
    /// Files stored at the disk root (outside any folder).
    pub root_file_count: u64,
    /// Total number of folders in the tree.
    pub total_folders: u64,
}

impl FolderTree {
    /// Create an empty folder tree.
    pub fn empty(disk_id: DiskId) -> Self {
        Self {
            disk_id,
            roots: Vec::new(),
            root_file_count: 0,
            total_folders: 0,
        }
    }

    /// Find a node anywhere in the tree.
    pub fn find(&self, id: FolderId) -> Option<&FolderNode> {
        fn walk(nodes: &[FolderNode], id: FolderId) -> Option<&FolderNode> {
            nodes.iter().find_map(|node| {
                if node.id == id {
                    Some(node)
                } else {
                    walk(&node.children, id)
                }
            })
        }
        walk(&self.roots, id)
    }
}
