//! Typed broker messages and their topic binding.
//!
//! Each message kind lives on exactly one broker topic, declared as an
//! associated constant so publisher and subscriber agree on the payload
//! schema at the type level. The topic string doubles as the kind
//! discriminator on the wire.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::{Feed, FeedId};

/// A domain message transportable over the broker.
///
/// Implementors bind one payload schema to one stable topic string. The
/// codec uses [`Self::TOPIC`] for error reporting and the bus uses it as
/// the broker subject for publish and subscribe.
pub trait BrokerMessage: Serialize + DeserializeOwned + Send + 'static {
    /// Stable broker subject for this message kind.
    const TOPIC: &'static str;
}

/// Announcement that a new feed was created.
///
/// The broker-transportable projection of a [`Feed`]; field-for-field
/// identical so the consumer side can reconstruct the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCreatedMessage {
    /// Identifier of the created feed.
    pub id: FeedId,
    /// Feed title.
    pub title: String,
    /// Feed description.
    pub description: String,
    /// Creation timestamp from the write path.
    pub created_at: DateTime<Utc>,
}

impl BrokerMessage for FeedCreatedMessage {
    const TOPIC: &'static str = "feeds.created";
}

impl From<&Feed> for FeedCreatedMessage {
    fn from(feed: &Feed) -> Self {
        Self {
            id: feed.id,
            title: feed.title.clone(),
            description: feed.description.clone(),
            created_at: feed.created_at,
        }
    }
}

impl From<FeedCreatedMessage> for Feed {
    fn from(message: FeedCreatedMessage) -> Self {
        Self {
            id: message.id,
            title: message.title,
            description: message.description,
            created_at: message.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn feed_round_trips_through_message() {
        let feed = Feed::new("title".to_string(), "description".to_string());
        let message = FeedCreatedMessage::from(&feed);
        let restored = Feed::from(message);
        assert_eq!(feed, restored);
    }

    #[test]
    fn topic_is_stable() {
        assert_eq!(FeedCreatedMessage::TOPIC, "feeds.created");
    }
}
