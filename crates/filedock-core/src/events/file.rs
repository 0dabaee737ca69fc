//! File-related domain events.

use serde::{Deserialize, Serialize};

use crate::types::{DiskId, FileId, FolderId};

/// Events related to registered files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FileEvent {
    /// A file was registered and its bytes handed to the adapter.
    Registered {
        /// The file ID.
        file_id: FileId,
        /// The owning disk.
        disk_id: DiskId,
        /// The containing folder, if any.
        folder_id: Option<FolderId>,
        /// The file name.
        name: String,
        /// The file size in bytes.
        size_bytes: i64,
        /// The detected MIME type.
        mime_type: String,
        /// SHA-256 content fingerprint.
        hash: String,
    },
    /// Mutable metadata changed.
    Updated {
        /// The file ID.
        file_id: FileId,
        /// Fields that changed.
        changed_fields: Vec<String>,
    },
    /// The record was removed; the adapter should reclaim the bytes.
    Deleted {
        /// The file ID.
        file_id: FileId,
        /// The disk the bytes live on.
        disk_id: DiskId,
        /// Mounted adapter name of that disk.
        adapter: String,
        /// Adapter-relative location of the bytes.
        location: String,
        /// The file name (for display after deletion).
        name: String,
    },
}
