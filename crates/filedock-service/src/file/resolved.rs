//! A file together with the records its paths are derived from.

use serde::{Deserialize, Serialize};

use filedock_entity::disk::Disk;
use filedock_entity::file::File;
use filedock_entity::folder::Folder;

/// File record joined with its disk and folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFile {
    /// The file.
    pub file: File,
    /// Its disk.
    pub disk: Disk,
    /// Its folder, if any.
    pub folder: Option<Folder>,
}

impl ResolvedFile {
    /// Adapter-relative location of the bytes.
    pub fn location(&self) -> String {
        self.file.location(self.folder.as_ref())
    }
}
