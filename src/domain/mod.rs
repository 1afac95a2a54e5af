//! Domain layer: feed identity and the feed entity.
//!
//! The gateway's domain is deliberately small: one aggregate (the feed)
//! created by the write path and announced to the rest of the system via
//! the event layer.

pub mod feed;
pub mod feed_id;

pub use feed::Feed;
pub use feed_id::FeedId;
