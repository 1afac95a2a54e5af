//! Service layer: feed orchestration over the storage, search, and
//! messaging seams.

pub mod feed_service;

pub use feed_service::FeedService;
