//! Fan-out of server events to every connected client.

use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::models::ServerEvent;

/// Transport-assigned connection identifier
pub type ConnectionId = Uuid;

/// Outbound queue of one connection
pub type EventReceiver = mpsc::UnboundedReceiver<ServerEvent>;

/// Registry of live connections
#[derive(Default)]
pub struct Broadcaster {
    connections: RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and hand back its outbound queue
    pub async fn register(&self) -> (ConnectionId, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.connections.write().await.insert(id, tx);
        (id, rx)
    }

    /// Forget a connection. Unknown ids are ignored.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        self.connections.write().await.remove(&id).is_some()
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Queue `event` for every connection; returns how many accepted it.
    ///
    /// Connections whose receiver has been dropped are pruned.
    pub async fn broadcast(&self, event: ServerEvent) -> usize {
        let mut stale = Vec::new();
        let mut delivered = 0;
        {
            let connections = self.connections.read().await;
            for (id, tx) in connections.iter() {
                if tx.send(event.clone()).is_ok() {
                    delivered += 1;
                } else {
                    stale.push(*id);
                }
            }
        }

        if !stale.is_empty() {
            let mut connections = self.connections.write().await;
            for id in &stale {
                connections.remove(id);
            }
        }

        debug!(
            event = event.name(),
            recipients = delivered,
            pruned = stale.len(),
            "broadcast event"
        );
        delivered
    }
}
