use std::sync::Arc;

use tokio::sync::broadcast;

use tally_types::events::GatewayEvent;

/// Fans mutation events out to every connected client.
///
/// Single in-process channel: connections register by subscribing and
/// unregister by dropping their receiver. There is no backlog — an event is
/// only delivered to receivers that existed when it was sent.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    broadcast_tx: broadcast::Sender<GatewayEvent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(1024);
        Self {
            inner: Arc::new(DispatcherInner { broadcast_tx }),
        }
    }

    /// Register a connection. Dropping the receiver unregisters it.
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Broadcast an event to all connected clients. A send with no
    /// subscribers is not an error; the event is simply dropped.
    pub fn broadcast(&self, event: GatewayEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }

    /// Number of currently registered connections.
    pub fn connection_count(&self) -> usize {
        self.inner.broadcast_tx.receiver_count()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
