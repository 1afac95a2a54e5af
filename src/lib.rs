//! # feedcast
//!
//! Real-time feed gateway: a REST write/query API whose domain events flow
//! through a NATS broker and fan out to live WebSocket subscribers.
//!
//! The write path saves a feed to PostgreSQL and publishes a
//! `feeds.created` message. Two in-process subscribers consume it: a
//! callback subscription indexes the feed into Elasticsearch, and a
//! channel subscription pushes it to every connected WebSocket client
//! through the connection hub. The hub's single dispatch loop owns the
//! connection registry; a slow client is evicted rather than allowed to
//! stall fan-out to everyone else.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler + Hub (ws/)
//!     │
//!     ├── FeedService (service/)
//!     ├── EventBus ↔ NATS (events/)
//!     │
//!     ├── PostgreSQL (persistence/)
//!     └── Elasticsearch (search/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod persistence;
pub mod search;
pub mod service;
pub mod ws;
