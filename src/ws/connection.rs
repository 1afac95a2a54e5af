//! Per-connection identity, outbound queue handle, and socket loop.
//!
//! Each accepted WebSocket runs [`run_connection`]: register with the hub,
//! then multiplex the write pump (drain the private outbound queue to the
//! socket) and the read pump (detect client close or transport failure) in
//! a single `select!` loop. One loop exit point means the cleanup path
//! cannot race: the connection unregisters exactly once, after which the
//! queue is dead and never reused.
//!
//! Lifecycle: connecting → registered → (draining on evict | closing on
//! error or client close) → closed.

use std::fmt;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::hub::Hub;

/// Unique identifier for one live client connection.
///
/// Random (UUID v4) and ephemeral: connection ids exist only for the
/// lifetime of the socket and are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Creates a new random `ConnectionId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The hub-side handle for one registered connection: its identity plus
/// the sending half of its bounded outbound queue.
///
/// The receiving half is drained by exactly one reader, the connection's
/// own socket loop; that single-reader invariant is what keeps per-client
/// delivery ordered and duplicate-free.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    outbound: mpsc::Sender<String>,
}

impl ConnectionHandle {
    /// Creates a handle from a connection id and the sending half of its
    /// outbound queue.
    #[must_use]
    pub fn new(id: ConnectionId, outbound: mpsc::Sender<String>) -> Self {
        Self { id, outbound }
    }

    /// Returns the connection id.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Attempts a non-blocking enqueue of one outbound frame.
    ///
    /// A `Full` result marks this connection as too slow to keep up; the
    /// dispatcher resolves it by eviction, never by waiting.
    pub(crate) fn try_enqueue(&self, frame: String) -> Result<(), TrySendError<String>> {
        self.outbound.try_send(frame)
    }
}

/// Runs the socket loop for one accepted WebSocket connection.
///
/// Clients are receive-only: inbound data frames are ignored and
/// keepalives are answered by the protocol layer. The loop ends when the
/// client closes, the transport fails, or the hub evicts the connection by
/// closing its outbound queue. In the eviction case a Close frame is sent
/// first so the client observes a deterministic shutdown.
pub async fn run_connection(socket: WebSocket, hub: Hub) {
    let connection_id = ConnectionId::new();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(hub.queue_capacity());
    hub.register(ConnectionHandle::new(connection_id, outbound_tx))
        .await;
    tracing::debug!(id = %connection_id, "ws connection registered");

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            frame = outbound_rx.recv() => {
                match frame {
                    Some(text) => {
                        if ws_tx.send(Message::text(text)).await.is_err() {
                            break;
                        }
                    }
                    // Queue closed: the hub evicted this connection.
                    None => {
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
            inbound = ws_rx.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    hub.unregister(connection_id).await;
    tracing::debug!(id = %connection_id, "ws connection closed");
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn connection_ids_are_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }

    #[test]
    fn enqueue_reports_full_queue() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(ConnectionId::new(), tx);
        assert!(handle.try_enqueue("m1".to_string()).is_ok());
        assert!(matches!(
            handle.try_enqueue("m2".to_string()),
            Err(TrySendError::Full(_))
        ));
    }

    #[test]
    fn enqueue_reports_closed_queue() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handle = ConnectionHandle::new(ConnectionId::new(), tx);
        assert!(matches!(
            handle.try_enqueue("m1".to_string()),
            Err(TrySendError::Closed(_))
        ));
    }
}
