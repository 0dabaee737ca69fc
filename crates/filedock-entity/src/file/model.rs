//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filedock_core::types::{DiskId, FileId, FolderId};

use super::entry::EntryRef;
use super::kind::FileType;
use crate::folder::Folder;

/// A registered file.
///
/// `hash`, `size_bytes`, `mime_type` and `extension` are computed from the
/// content at registration and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The disk holding the bytes.
    pub disk_id: DiskId,
    /// The containing folder (same disk), if any.
    pub folder_id: Option<FolderId>,
    /// The file name (including extension).
    pub name: String,
    /// Lowercase extension without the dot; empty if unknown.
    pub extension: String,
    /// Detected MIME type.
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// SHA-256 hex digest of the content.
    pub hash: String,
    /// Alternative text for images.
    pub alt: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Sorted, de-duplicated keywords.
    pub keywords: Vec<String>,
    /// The entry this file is attached to.
    pub entry: Option<EntryRef>,
    /// When the content was written.
    pub last_modified: DateTime<Utc>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Classification derived from the MIME type.
    pub fn file_type(&self) -> FileType {
        FileType::from_mime(&self.mime_type)
    }

    /// Whether the file renders as an image.
    pub fn is_image(&self) -> bool {
        self.file_type() == FileType::Image
    }

    /// Adapter-relative location given the file's folder.
    pub fn location(&self, folder: Option<&Folder>) -> String {
        storage_location(folder, &self.name)
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The owning disk.
    pub disk_id: DiskId,
    /// The containing folder.
    pub folder_id: Option<FolderId>,
    /// The file name.
    pub name: String,
    /// Lowercase extension.
    pub extension: String,
    /// MIME type.
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// SHA-256 hex digest.
    pub hash: String,
    /// Alternative text.
    pub alt: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Keywords.
    pub keywords: Vec<String>,
    /// Owning entry.
    pub entry: Option<EntryRef>,
}

/// Location of `name` inside `folder` relative to the adapter root:
/// `docs/reports/a.txt`, or just `a.txt` at the disk root.
pub fn storage_location(folder: Option<&Folder>, name: &str) -> String {
    match folder {
        Some(folder) if !folder.relative_path().is_empty() => {
            format!("{}/{}", folder.relative_path(), name)
        }
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(path: &str) -> Folder {
        let now = Utc::now();
        Folder {
            id: FolderId::new(),
            disk_id: DiskId::new(),
            parent_id: None,
            name: path.rsplit('/').next().unwrap_or_default().to_string(),
            path: path.to_string(),
            depth: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_storage_location() {
        assert_eq!(storage_location(None, "a.txt"), "a.txt");
        assert_eq!(
            storage_location(Some(&folder("/docs/reports")), "a.txt"),
            "docs/reports/a.txt"
        );
    }
}
