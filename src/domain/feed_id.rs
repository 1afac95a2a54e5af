//! Type-safe feed identifier.
//!
//! [`FeedId`] is a newtype wrapper around a time-ordered [`uuid::Uuid`]
//! (v7), so feed identifiers sort by creation time and cannot be confused
//! with other UUIDs in the system.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a feed.
///
/// Wraps a UUID v7, assigned once by the write path at creation time and
/// immutable thereafter. Because v7 encodes a timestamp prefix, ids are
/// sortable in creation order, which the list endpoint relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedId(uuid::Uuid);

impl FeedId {
    /// Creates a new time-ordered `FeedId` (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Creates a `FeedId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for FeedId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for FeedId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<FeedId> for uuid::Uuid {
    fn from(id: FeedId) -> Self {
        id.0
    }
}
