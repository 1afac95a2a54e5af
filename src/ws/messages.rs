//! Client-facing push frames.
//!
//! Frames crossing the WebSocket boundary are JSON with a `type`
//! discriminator, a human-readable encoding deliberately distinct from
//! the binary payload used on the broker side, since clients are a
//! different trust boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::FeedId;
use crate::events::FeedCreatedMessage;

/// Outbound message pushed to connected WebSocket clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushMessage {
    /// A new feed was created.
    FeedCreated {
        /// Identifier of the created feed.
        id: FeedId,
        /// Feed title.
        title: String,
        /// Feed description.
        description: String,
        /// Creation timestamp.
        created_at: DateTime<Utc>,
    },
}

impl From<FeedCreatedMessage> for PushMessage {
    fn from(message: FeedCreatedMessage) -> Self {
        Self::FeedCreated {
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
    fn frame_carries_type_discriminator() {
        let frame = PushMessage::FeedCreated {
            id: FeedId::new(),
            title: "A".to_string(),
            description: "d".to_string(),
            created_at: Utc::now(),
        };
        let Ok(json) = serde_json::to_string(&frame) else {
            panic!("serialization failed");
        };
        assert!(json.contains("\"type\":\"feed_created\""));
        assert!(json.contains("\"title\":\"A\""));
    }

    #[test]
    fn frame_round_trips() {
        let frame = PushMessage::from(FeedCreatedMessage {
            id: FeedId::new(),
            title: "A".to_string(),
            description: "d".to_string(),
            created_at: Utc::now(),
        });
        let Ok(json) = serde_json::to_string(&frame) else {
            panic!("serialization failed");
        };
        let Ok(parsed) = serde_json::from_str::<PushMessage>(&json) else {
            panic!("deserialization failed");
        };
        assert_eq!(frame, parsed);
    }
}
