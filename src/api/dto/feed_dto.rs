//! Feed DTOs for the create, list, and search endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Feed, FeedId};

/// Request body for `POST /feeds`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFeedRequest {
    /// Feed title. Must not be empty.
    pub title: String,
    /// Feed description.
    #[serde(default)]
    pub description: String,
}

/// A feed as returned by every read endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedResponse {
    /// Unique feed identifier.
    #[schema(value_type = String)]
    pub id: FeedId,
    /// Feed title.
    pub title: String,
    /// Feed description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Feed> for FeedResponse {
    fn from(feed: Feed) -> Self {
        Self {
            id: feed.id,
            title: feed.title,
            description: feed.description,
            created_at: feed.created_at,
        }
    }
}

/// Query parameters for `GET /search`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Full-text query string. Required and non-empty.
    pub q: String,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn response_mirrors_feed() {
        let feed = Feed::new("A".to_string(), "d".to_string());
        let response = FeedResponse::from(feed.clone());
        assert_eq!(response.id, feed.id);
        assert_eq!(response.title, "A");
        assert_eq!(response.created_at, feed.created_at);
    }

    #[test]
    fn request_defaults_description() {
        let Ok(req) = serde_json::from_str::<CreateFeedRequest>(r#"{"title":"A"}"#) else {
            panic!("deserialization failed");
        };
        assert_eq!(req.title, "A");
        assert!(req.description.is_empty());
    }
}
