//! Surface lifecycle notifications
//!
//! The registry announces every start, commit and stop. Subscribers that
//! fall more than `event_capacity` events behind lose the oldest ones; the
//! commit path itself never waits on a subscriber.

use dom::SurfaceId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurfaceEvent {
    Started { surface_id: SurfaceId },
    Committed { surface_id: SurfaceId, sequence: u64 },
    Stopped { surface_id: SurfaceId },
}

impl SurfaceEvent {
    pub fn surface_id(&self) -> SurfaceId {
        match self {
            SurfaceEvent::Started { surface_id }
            | SurfaceEvent::Committed { surface_id, .. }
            | SurfaceEvent::Stopped { surface_id } => *surface_id,
        }
    }
}

pub struct EventBus {
    tx: broadcast::Sender<SurfaceEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// A zero capacity is raised to one
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Deliver `event` to every current subscriber, returning how many
    pub fn publish(&self, event: SurfaceEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!("No subscribers for {:?}", event);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SurfaceEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
