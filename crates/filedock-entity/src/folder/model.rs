//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filedock_core::error::AppError;
use filedock_core::types::{DiskId, FolderId};

/// A folder grouping files within one disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The disk this folder belongs to.
    pub disk_id: DiskId,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Full materialized path (e.g., `/documents/reports`).
    pub path: String,
    /// Depth in the folder tree (0 for root).
    pub depth: i32,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Path without the leading slash, as used in storage locations.
    pub fn relative_path(&self) -> &str {
        self.path.trim_start_matches('/')
    }

    /// Materialized path of a child named `name`.
    pub fn child_path(&self, name: &str) -> String {
        format!("{}/{}", self.path, name)
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// The owning disk.
    pub disk_id: DiskId,
    /// Parent folder (None for root).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Full materialized path.
    pub path: String,
    /// Depth in the tree.
    pub depth: i32,
}

/// Validate a folder or file name: non-empty, no path separators, not a
/// dot segment.
pub fn validate_name(kind: &str, name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::validation(format!("{kind} name cannot be empty")));
    }
    if name != name.trim() {
        return Err(AppError::validation(format!(
            "{kind} name cannot start or end with whitespace"
        )));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(AppError::validation(format!(
            "{kind} name '{name}' cannot contain path separators"
        )));
    }
    if name == "." || name == ".." {
        return Err(AppError::validation(format!("{kind} name '{name}' is reserved")));
    }
    if name.chars().count() > 255 {
        return Err(AppError::validation(format!(
            "{kind} name cannot exceed 255 characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Folder", "reports").is_ok());
        assert!(validate_name("Folder", "").is_err());
        assert!(validate_name("Folder", " x").is_err());
        assert!(validate_name("Folder", "a/b").is_err());
        assert!(validate_name("Folder", "..").is_err());
        assert!(validate_name("File", &"x".repeat(256)).is_err());
    }

    #[test]
    fn test_paths() {
        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(),
            disk_id: DiskId::new(),
            parent_id: None,
            name: "docs".into(),
            path: "/docs".into(),
            depth: 0,
            created_at: now,
            updated_at: now,
        };
        assert!(folder.is_root());
        assert_eq!(folder.relative_path(), "docs");
        assert_eq!(folder.child_path("2024"), "/docs/2024");
    }
}
