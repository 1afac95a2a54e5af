//! The feed entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FeedId;

/// A published feed entry, the single aggregate this gateway manages.
///
/// Produced once by the write path and never mutated afterwards. The same
/// value is stored in PostgreSQL, indexed into Elasticsearch, and projected
/// into the broker message announcing its creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    /// Unique, time-ordered identifier.
    pub id: FeedId,
    /// Feed title.
    pub title: String,
    /// Feed description.
    pub description: String,
    /// UTC creation timestamp, assigned by the write path.
    pub created_at: DateTime<Utc>,
}

impl Feed {
    /// Creates a new feed with a fresh id and the current UTC timestamp.
    #[must_use]
    pub fn new(title: String, description: String) -> Self {
        Self {
            id: FeedId::new(),
            title,
            description,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_assigns_id_and_timestamp() {
        let feed = Feed::new("title".to_string(), "description".to_string());
        assert_eq!(feed.title, "title");
        assert!(feed.created_at <= Utc::now());
    }

    #[test]
    fn two_feeds_get_distinct_ids() {
        let a = Feed::new("a".to_string(), String::new());
        let b = Feed::new("b".to_string(), String::new());
        assert_ne!(a.id, b.id);
    }
}
