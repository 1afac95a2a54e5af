//! Event layer: typed broker messages, the binary payload codec, and the
//! NATS-backed event bus with callback and channel consumption.

pub mod bus;
pub mod codec;
pub mod messages;

pub use bus::{EventBus, EventPublisher};
pub use messages::{BrokerMessage, FeedCreatedMessage};
