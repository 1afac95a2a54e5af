//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::FeedService;
use crate::ws::Hub;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Feed service for the write and query paths.
    pub feed_service: Arc<FeedService>,
    /// Connection hub for WebSocket fan-out.
    pub hub: Hub,
}
