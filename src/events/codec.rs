//! Binary codec for broker payloads.
//!
//! Pure, stateless translation between typed messages and the compact
//! binary payload carried by the broker. The client-facing WebSocket
//! boundary uses JSON instead (see [`crate::ws::messages`]); the two
//! encodings never mix.

use crate::error::GatewayError;

use super::messages::BrokerMessage;

/// Encodes a message into its broker payload.
///
/// Deterministic and total over every value the fixed schemas can produce.
///
/// # Errors
///
/// Returns [`GatewayError::Encode`] if the serializer rejects the value,
/// which cannot happen for the schemas this system defines.
pub fn encode<M: BrokerMessage>(message: &M) -> Result<Vec<u8>, GatewayError> {
    bincode::serialize(message).map_err(|err| GatewayError::Encode {
        topic: M::TOPIC,
        reason: err.to_string(),
    })
}

/// Decodes a broker payload into the message type bound to its topic.
///
/// Symmetric with [`encode`] for every value this system produces.
///
/// # Errors
///
/// Returns [`GatewayError::Decode`] if the payload does not match the
/// schema the topic's type declares. Corrupt payloads fail loudly here;
/// they are never forwarded.
pub fn decode<M: BrokerMessage>(payload: &[u8]) -> Result<M, GatewayError> {
    bincode::deserialize(payload).map_err(|err| GatewayError::Decode {
        topic: M::TOPIC,
        reason: err.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::super::messages::FeedCreatedMessage;
    use super::*;
    use crate::domain::FeedId;

    fn sample() -> FeedCreatedMessage {
        FeedCreatedMessage {
            id: FeedId::new(),
            title: "A".to_string(),
            description: "d".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let message = sample();
        let Ok(payload) = encode(&message) else {
            panic!("encode failed");
        };
        let Ok(decoded) = decode::<FeedCreatedMessage>(&payload) else {
            panic!("decode failed");
        };
        assert_eq!(message, decoded);
    }

    #[test]
    fn decode_rejects_garbage() {
        let result = decode::<FeedCreatedMessage>(&[0xff, 0x00, 0x13, 0x37]);
        assert!(matches!(result, Err(GatewayError::Decode { .. })));
    }

    #[test]
    fn decode_rejects_truncated_payload() {
        let message = sample();
        let Ok(payload) = encode(&message) else {
            panic!("encode failed");
        };
        let truncated = payload.get(..payload.len() / 2).unwrap_or(&[]);
        let result = decode::<FeedCreatedMessage>(truncated);
        assert!(matches!(result, Err(GatewayError::Decode { .. })));
    }

    #[test]
    fn encode_is_deterministic() {
        let message = sample();
        let a = encode(&message).ok();
        let b = encode(&message).ok();
        assert_eq!(a, b);
        assert!(a.is_some());
    }
}
