//! WebSocket layer: connection hub, registry, per-connection loop, and
//! push frames.
//!
//! The endpoint at `/ws` is receive-only for clients: every broadcast
//! submitted to the [`Hub`] is fanned out to all registered connections
//! through their private bounded queues.

pub mod connection;
pub mod handler;
pub mod hub;
pub mod messages;
pub mod registry;

pub use connection::{ConnectionHandle, ConnectionId};
pub use hub::{Hub, HubDispatcher};
pub use messages::PushMessage;
pub use registry::ConnectionRegistry;
