// GET /socket handler

use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, warn};
use warp::ws::{Message, WebSocket};

use crate::models::ClientEvent;
use crate::relay::RelayServer;

/// Drive one upgraded client socket until it closes.
///
/// Outbound broadcasts are pumped by a separate task. Each event runs on its
/// own task so the read loop keeps accepting frames while a completion call
/// or a serial write is in flight.
pub async fn client_connected(socket: WebSocket, relay: Arc<RelayServer>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (connection_id, rx) = relay.connect().await;

    let mut outbound = UnboundedReceiverStream::new(rx);
    let writer = tokio::spawn(async move {
        while let Some(event) = outbound.next().await {
            let frame = match serde_json::to_string(&event) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(event = event.name(), error = %e, "failed to serialize event");
                    continue;
                }
            };
            if let Err(e) = ws_tx.send(Message::text(frame)).await {
                debug!(connection_id = %connection_id, error = %e, "socket send failed");
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        let message = match result {
            Ok(message) => message,
            Err(e) => {
                debug!(connection_id = %connection_id, error = %e, "socket read failed");
                break;
            }
        };

        if message.is_close() {
            break;
        }
        let Ok(text) = message.to_str() else {
            continue;
        };

        match ClientEvent::parse(text) {
            Ok(event) => {
                let relay = Arc::clone(&relay);
                tokio::spawn(async move { relay.dispatch(event).await });
            }
            Err(e) => {
                warn!(connection_id = %connection_id, error = %e, "ignoring client frame")
            }
        }
    }

    relay.disconnect(connection_id).await;
    writer.abort();
}
