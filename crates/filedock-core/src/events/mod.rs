//! Domain events emitted by registry operations.
//!
//! Events are published on the [`EventBus`] and consumed by the storage
//! reclaimer and by any host subscriber (audit, cache invalidation).

pub mod bus;
pub mod disk;
pub mod file;
pub mod folder;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use bus::EventBus;
pub use disk::DiskEvent;
pub use file::FileEvent;
pub use folder::FolderEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A disk-related event.
    Disk(DiskEvent),
    /// A folder-related event.
    Folder(FolderEvent),
    /// A file-related event.
    File(FileEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

impl From<DiskEvent> for EventPayload {
    fn from(event: DiskEvent) -> Self {
        Self::Disk(event)
    }
}

impl From<FolderEvent> for EventPayload {
    fn from(event: FolderEvent) -> Self {
        Self::Folder(event)
    }
}

impl From<FileEvent> for EventPayload {
    fn from(event: FileEvent) -> Self {
        Self::File(event)
    }
}
