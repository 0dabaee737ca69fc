//! Inputs to the file registry.

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};

use filedock_core::types::{DiskId, FolderId};
use filedock_entity::file::EntryRef;

/// Request to register uploaded content.
#[derive(Debug, Clone)]
pub struct RegisterFileRequest {
    /// Disk that will hold the bytes.
    pub disk_id: DiskId,
    /// Folder on that disk, or the disk root.
    pub folder_id: Option<FolderId>,
    /// Raw content.
    pub content: Bytes,
    /// File name including extension.
    pub name: String,
    /// Entry the file is attached to.
    pub entry: Option<EntryRef>,
    /// Alternative text.
    pub alt: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Keywords; normalized on save.
    pub keywords: Vec<String>,
}

impl RegisterFileRequest {
    /// Minimal request: content and name at the root of a disk.
    pub fn new(disk_id: DiskId, name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            disk_id,
            folder_id: None,
            content: content.into(),
            name: name.into(),
            entry: None,
            alt: None,
            description: None,
            keywords: Vec::new(),
        }
    }

    /// Place the file in a folder.
    pub fn in_folder(mut self, folder_id: FolderId) -> Self {
        self.folder_id = Some(folder_id);
        self
    }

    /// Attach the file to an entry.
    pub fn attached_to(mut self, entry: EntryRef) -> Self {
        self.entry = Some(entry);
        self
    }
}

/// Partial update of a file's metadata.
///
/// `hash`, `size`, `mime_type` and `extension` are accepted so that a
/// payload carrying them can be rejected as a whole; they are never applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileMetadataPatch {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New alternative text; blank clears it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Replacement keyword set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// New description; blank clears it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `Some(None)` moves the file to the disk root.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder_id: Option<Option<FolderId>>,
    /// `Some(None)` detaches the file from its entry.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub entry: Option<Option<EntryRef>>,
    /// Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Immutable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl FileMetadataPatch {
    /// Names of immutable fields present in the patch.
    pub fn immutable_fields(&self) -> Vec<&'static str> {
        [
            ("hash", self.hash.is_some()),
            ("size", self.size.is_some()),
            ("mime_type", self.mime_type.is_some()),
            ("extension", self.extension.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect()
    }
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trim, drop blanks, sort and de-duplicate.
pub(crate) fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// Trimmed text, or `None` when blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
