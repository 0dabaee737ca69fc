//! Storage reclaimer: removes bytes after their file record is deleted.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use filedock_core::events::{DomainEvent, EventPayload, FileEvent};
use filedock_core::result::AppResult;

use crate::manager::AdapterRegistry;

/// Answers whether a live record still owns a stored location.
///
/// Deletion events are handled after the record is gone, so a new file may
/// have taken the same location in the meantime.
#[async_trait]
pub trait LocationGuard: Send + Sync + std::fmt::Debug + 'static {
    /// Whether any live file on a disk mounted on `adapter` resolves to
    /// `location`.
    async fn in_use(&self, adapter: &str, location: &str) -> AppResult<bool>;
}

/// Consumes `FileEvent::Deleted` and deletes the bytes from the adapter.
#[derive(Debug, Clone)]
pub struct StorageReclaimer {
    adapters: AdapterRegistry,
    guard: Option<Arc<dyn LocationGuard>>,
}

impl StorageReclaimer {
    /// Create a reclaimer over the mounted adapters.
    pub fn new(adapters: AdapterRegistry) -> Self {
        Self {
            adapters,
            guard: None,
        }
    }

    /// Skip locations that `guard` reports as owned by a live record.
    pub fn with_guard(mut self, guard: Arc<dyn LocationGuard>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Handle one event. Returns `true` when bytes were reclaimed.
    pub async fn handle(&self, event: &DomainEvent) -> AppResult<bool> {
        let EventPayload::File(FileEvent::Deleted {
            file_id,
            adapter,
            location,
            ..
        }) = &event.payload
        else {
            return Ok(false);
        };

        if let Some(guard) = &self.guard {
            if guard.in_use(adapter, location).await? {
                info!(file_id = %file_id, adapter = %adapter, location = %location, "Location reused by a live file, keeping bytes");
                return Ok(false);
            }
        }

        let disk_adapter = self.adapters.get(adapter)?;
        disk_adapter.delete(location).await?;
        info!(file_id = %file_id, adapter = %adapter, location = %location, "Reclaimed file bytes");
        Ok(true)
    }

    /// Process events until the channel closes or `cancel` flips to `true`.
    ///
    /// Events dropped while lagging are not replayed; their bytes stay in
    /// the adapter.
    pub async fn run(
        &self,
        mut events: broadcast::Receiver<DomainEvent>,
        mut cancel: watch::Receiver<bool>,
    ) {
        info!("Storage reclaimer started");
        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                received = events.recv() => match received {
                    Ok(event) => {
                        if let Err(e) = self.handle(&event).await {
                            warn!(event_id = %event.id, error = %e, "Failed to reclaim file bytes");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(
                            skipped,
                            "Storage reclaimer lagged behind the event bus; skipped deletions leave orphaned bytes"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Event bus closed");
                        break;
                    }
                },
            }
        }
        info!("Storage reclaimer stopped");
    }

    /// Run the reclaimer on a background task.
    pub fn spawn(
        self,
        events: broadcast::Receiver<DomainEvent>,
        cancel: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(events, cancel).await })
    }
}
