//! Request/response DTOs for the REST API.

pub mod feed_dto;

pub use feed_dto::{CreateFeedRequest, FeedResponse, SearchParams};
