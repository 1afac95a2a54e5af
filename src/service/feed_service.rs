//! Feed service: orchestrates the write path and the query paths.

use std::fmt;
use std::sync::Arc;

use crate::domain::Feed;
use crate::error::GatewayError;
use crate::events::{EventPublisher, FeedCreatedMessage};
use crate::persistence::FeedRepository;
use crate::search::SearchIndex;

/// Orchestration layer for feed operations.
///
/// Stateless coordinator over the repository, the search index, and the
/// event publisher. The write path is save-then-publish: a failed save
/// aborts the request, while a failed publish is logged and tolerated
/// because the stored feed is authoritative and downstream projections
/// catch up eventually.
#[derive(Clone)]
pub struct FeedService {
    repository: Arc<dyn FeedRepository>,
    search: Arc<dyn SearchIndex>,
    publisher: Arc<dyn EventPublisher>,
}

impl fmt::Debug for FeedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedService").finish_non_exhaustive()
    }
}

impl FeedService {
    /// Creates a new `FeedService`.
    #[must_use]
    pub fn new(
        repository: Arc<dyn FeedRepository>,
        search: Arc<dyn SearchIndex>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            search,
            publisher,
        }
    }

    /// Creates a feed: validate, save, then announce on the broker.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an empty title or
    /// [`GatewayError::Repository`] if the save fails. A publish failure
    /// is not an error for the caller.
    pub async fn create_feed(
        &self,
        title: String,
        description: String,
    ) -> Result<Feed, GatewayError> {
        if title.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "title must not be empty".to_string(),
            ));
        }

        let feed = Feed::new(title, description);
        self.repository.insert_feed(&feed).await?;

        if let Err(err) = self
            .publisher
            .publish_feed_created(FeedCreatedMessage::from(&feed))
            .await
        {
            // The save is authoritative; the announcement is best-effort.
            tracing::error!(%err, feed_id = %feed.id, "failed to publish feed created event");
        }

        tracing::info!(feed_id = %feed.id, "feed created");
        Ok(feed)
    }

    /// Lists all stored feeds.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Repository`] on storage failure.
    pub async fn list_feeds(&self) -> Result<Vec<Feed>, GatewayError> {
        self.repository.list_feeds().await
    }

    /// Full-text search over feed titles and descriptions.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Search`] on backend failure.
    pub async fn search_feeds(&self, query: &str) -> Result<Vec<Feed>, GatewayError> {
        self.search.search_feeds(query).await
    }
}
