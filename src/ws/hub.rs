//! Connection hub: command channel plus single-writer dispatch loop.
//!
//! All registry mutation and every broadcast flow through one dispatch
//! task, so no two tasks ever touch the connection set concurrently and
//! broadcasts are applied in a single global order. Fan-out uses
//! non-blocking enqueues onto each connection's bounded queue; a
//! connection whose queue is full is evicted rather than allowed to stall
//! delivery to everyone else.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::connection::{ConnectionHandle, ConnectionId};
use super::messages::PushMessage;
use super::registry::ConnectionRegistry;

/// Depth of the dispatcher's command queue.
const DISPATCH_QUEUE_CAPACITY: usize = 64;

#[derive(Debug)]
enum HubCommand {
    Register(ConnectionHandle),
    Unregister(ConnectionId),
    Broadcast {
        frame: String,
        exclude: Option<ConnectionId>,
    },
}

/// Cloneable front half of the hub: submits commands to the dispatch loop.
///
/// Created together with its [`HubDispatcher`] by [`Hub::new`]; the
/// dispatcher must be spawned (`tokio::spawn(dispatcher.run())`) for any
/// command to take effect.
#[derive(Debug, Clone)]
pub struct Hub {
    cmd_tx: mpsc::Sender<HubCommand>,
    queue_capacity: usize,
}

impl Hub {
    /// Creates a hub and its dispatch half.
    ///
    /// `queue_capacity` bounds each connection's private outbound queue.
    #[must_use]
    pub fn new(queue_capacity: usize) -> (Self, HubDispatcher) {
        let (cmd_tx, cmd_rx) = mpsc::channel(DISPATCH_QUEUE_CAPACITY);
        let hub = Self {
            cmd_tx,
            queue_capacity,
        };
        let dispatcher = HubDispatcher {
            cmd_rx,
            registry: ConnectionRegistry::new(),
        };
        (hub, dispatcher)
    }

    /// Capacity used for each new connection's outbound queue.
    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Registers a connection with the dispatch loop.
    pub async fn register(&self, handle: ConnectionHandle) {
        self.send(HubCommand::Register(handle)).await;
    }

    /// Unregisters a connection. Idempotent.
    pub async fn unregister(&self, id: ConnectionId) {
        self.send(HubCommand::Unregister(id)).await;
    }

    /// Broadcasts a message to every registered connection except
    /// `exclude`.
    ///
    /// The frame is serialized once here; the dispatch loop enqueues it on
    /// each live connection without blocking. Broadcasts submitted in
    /// sequence are observed in the same order by every connection.
    pub async fn broadcast(&self, message: PushMessage, exclude: Option<ConnectionId>) {
        let frame = match serde_json::to_string(&message) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!(%err, "failed to serialize push frame");
                return;
            }
        };
        self.send(HubCommand::Broadcast { frame, exclude }).await;
    }

    async fn send(&self, command: HubCommand) {
        if self.cmd_tx.send(command).await.is_err() {
            tracing::debug!("hub dispatcher stopped, command dropped");
        }
    }
}

/// Owning half of the hub: the registry and the dispatch loop.
#[derive(Debug)]
pub struct HubDispatcher {
    cmd_rx: mpsc::Receiver<HubCommand>,
    registry: ConnectionRegistry,
}

impl HubDispatcher {
    /// Runs the dispatch loop until every [`Hub`] clone is dropped.
    ///
    /// This loop is the single writer of registry state; commands are
    /// applied strictly in arrival order.
    pub async fn run(mut self) {
        while let Some(command) = self.cmd_rx.recv().await {
            self.apply(command);
        }
        tracing::debug!("hub dispatch loop stopped");
    }

    fn apply(&mut self, command: HubCommand) {
        match command {
            HubCommand::Register(handle) => {
                self.registry.register(handle);
            }
            HubCommand::Unregister(id) => {
                self.registry.unregister(&id);
            }
            HubCommand::Broadcast { frame, exclude } => {
                self.fan_out(&frame, exclude);
            }
        }
    }

    /// Enqueues one frame on every live connection except `exclude`.
    ///
    /// A full queue evicts its connection: the handle is removed from the
    /// registry, which closes the queue and lets the connection's socket
    /// loop shut the transport down. Fan-out to the remaining connections
    /// is unaffected.
    fn fan_out(&mut self, frame: &str, exclude: Option<ConnectionId>) {
        let mut evicted: Vec<ConnectionId> = Vec::new();
        for handle in self.registry.snapshot() {
            if exclude == Some(handle.id()) {
                continue;
            }
            match handle.try_enqueue(frame.to_owned()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(id = %handle.id(), "outbound queue full, evicting slow connection");
                    evicted.push(handle.id());
                }
                Err(TrySendError::Closed(_)) => {
                    evicted.push(handle.id());
                }
            }
        }
        for id in evicted {
            self.registry.unregister(&id);
        }
    }
}
