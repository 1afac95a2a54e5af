//! Registry of live client connections.
//!
//! The registry is a plain map with no interior locking: it is owned and
//! mutated exclusively by the hub's dispatch loop, and everyone else
//! requests mutation by message. Broadcast iterates over a point-in-time
//! [`ConnectionRegistry::snapshot`], so a connection unregistered mid-fan-out
//! may still receive one already-enqueued message, which is acceptable
//! under best-effort delivery.

use std::collections::HashMap;

use super::connection::{ConnectionHandle, ConnectionId};

/// The set of currently registered connections, keyed by id.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, ConnectionHandle>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection. No-op if a connection with the same id is
    /// already registered.
    pub fn register(&mut self, handle: ConnectionHandle) {
        self.connections.entry(handle.id()).or_insert(handle);
    }

    /// Removes a connection by id. Idempotent: unregistering an absent id
    /// is a no-op, so eviction and the connection's own cleanup may both
    /// call it without coordination.
    pub fn unregister(&mut self, id: &ConnectionId) {
        self.connections.remove(id);
    }

    /// Returns a point-in-time copy of the current connection set.
    ///
    /// Iterating the copy never observes later mutation.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ConnectionHandle> {
        self.connections.values().cloned().collect()
    }

    /// Returns the number of registered connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Returns `true` if no connections are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn handle() -> ConnectionHandle {
        let (tx, _rx) = mpsc::channel(1);
        ConnectionHandle::new(ConnectionId::new(), tx)
    }

    #[test]
    fn register_then_unregister() {
        let mut registry = ConnectionRegistry::new();
        let handle = handle();
        let id = handle.id();
        registry.register(handle);
        assert_eq!(registry.len(), 1);
        registry.unregister(&id);
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicate_register_is_noop() {
        let mut registry = ConnectionRegistry::new();
        let (tx_a, _rx_a) = mpsc::channel(1);
        let id = ConnectionId::new();
        registry.register(ConnectionHandle::new(id, tx_a));

        let (tx_b, mut rx_b) = mpsc::channel(1);
        registry.register(ConnectionHandle::new(id, tx_b));
        assert_eq!(registry.len(), 1);

        // The first handle won; the duplicate's queue stays untouched.
        for handle in registry.snapshot() {
            let _ = handle.try_enqueue("m".to_string());
        }
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn unregister_twice_is_noop() {
        let mut registry = ConnectionRegistry::new();
        let handle = handle();
        let id = handle.id();
        registry.register(handle);
        registry.unregister(&id);
        registry.unregister(&id);
        assert!(registry.is_empty());
    }

    #[test]
    fn snapshot_is_isolated_from_later_mutation() {
        let mut registry = ConnectionRegistry::new();
        let handle = handle();
        let id = handle.id();
        registry.register(handle);

        let snapshot = registry.snapshot();
        registry.unregister(&id);

        assert_eq!(snapshot.len(), 1);
        assert!(registry.is_empty());
    }
}
