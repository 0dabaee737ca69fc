//! In-process event bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;
use tracing::debug;

use super::{DomainEvent, EventPayload};

/// Fan-out publisher for [`DomainEvent`]s.
///
/// Publishing never fails: with no subscribers the event is dropped, and
/// subscribers that fall more than `buffer_size` events behind observe
/// `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with the given channel capacity (minimum 1).
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size.max(1));
        Self { sender }
    }

    /// Publish a payload and return the wrapped event.
    pub fn publish(&self, payload: impl Into<EventPayload>) -> DomainEvent {
        let event = DomainEvent::new(payload.into());
        let receivers = self.sender.send(event.clone()).unwrap_or(0);
        debug!(event_id = %event.id, receivers, "Published domain event");
        event
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
