//! Disk-related domain events.

use serde::{Deserialize, Serialize};

use crate::types::DiskId;

/// Events related to disk records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DiskEvent {
    /// A disk was created.
    Created {
        /// The disk ID.
        disk_id: DiskId,
        /// The disk slug.
        slug: String,
        /// The adapter the disk is mounted on.
        adapter: String,
    },
    /// A disk's translatable fields changed.
    Updated {
        /// The disk ID.
        disk_id: DiskId,
        /// Fields that changed.
        changed_fields: Vec<String>,
    },
    /// A disk was deleted.
    Deleted {
        /// The disk ID.
        disk_id: DiskId,
        /// The slug it had.
        slug: String,
    },
}
