//! Search layer: full-text indexing and query behind the [`SearchIndex`]
//! contract.
//!
//! The index is populated asynchronously from the broker (a callback
//! subscription), so it is eventually consistent with the repository.

pub mod elastic;

use async_trait::async_trait;

use crate::domain::Feed;
use crate::error::GatewayError;

/// Index/search contract for the full-text backend.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Indexes one feed document, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Search`] on backend failure.
    async fn index_feed(&self, feed: &Feed) -> Result<(), GatewayError>;

    /// Runs a full-text query over feed titles and descriptions.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Search`] on backend failure.
    async fn search_feeds(&self, query: &str) -> Result<Vec<Feed>, GatewayError>;
}

pub use elastic::ElasticSearchIndex;
