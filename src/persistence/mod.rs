//! Persistence layer: feed storage behind the [`FeedRepository`] contract.
//!
//! The write path saves before publishing; a publish failure never rolls a
//! save back. The concrete implementation uses `sqlx::PgPool` for async
//! PostgreSQL access.

pub mod postgres;

use async_trait::async_trait;

use crate::domain::Feed;
use crate::error::GatewayError;

/// Save/list contract for feed storage.
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// Inserts a feed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Repository`] on storage failure.
    async fn insert_feed(&self, feed: &Feed) -> Result<(), GatewayError>;

    /// Lists all feeds in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Repository`] on storage failure.
    async fn list_feeds(&self) -> Result<Vec<Feed>, GatewayError>;
}

pub use postgres::PostgresFeedRepository;
