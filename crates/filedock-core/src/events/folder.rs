//! Folder-related domain events.

use serde::{Deserialize, Serialize};

use crate::types::{DiskId, FolderId};

/// Events related to folder records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FolderEvent {
    /// A folder was created.
    Created {
        /// The folder ID.
        folder_id: FolderId,
        /// The owning disk.
        disk_id: DiskId,
        /// Materialized path.
        path: String,
    },
    /// An empty folder was deleted.
    Deleted {
        /// The folder ID.
        folder_id: FolderId,
        /// The owning disk.
        disk_id: DiskId,
        /// Materialized path it had.
        path: String,
    },
}
