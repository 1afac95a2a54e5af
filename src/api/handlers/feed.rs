//! Feed handlers: create, list, search.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CreateFeedRequest, FeedResponse, SearchParams};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /feeds` — Create a new feed.
///
/// Saves the feed, then announces it on the broker; connected WebSocket
/// clients and the search index pick the announcement up asynchronously.
///
/// # Errors
///
/// Returns [`GatewayError`] on validation or storage failure.
#[utoipa::path(
    post,
    path = "/api/v1/feeds",
    tag = "Feeds",
    summary = "Create a feed",
    description = "Creates a feed entry. The feed is stored, then broadcast to WebSocket subscribers and indexed for search, both asynchronously.",
    request_body = CreateFeedRequest,
    responses(
        (status = 201, description = "Feed created", body = FeedResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    )
)]
pub async fn create_feed(
    State(state): State<AppState>,
    Json(req): Json<CreateFeedRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let feed = state
        .feed_service
        .create_feed(req.title, req.description)
        .await?;

    Ok((StatusCode::CREATED, Json(FeedResponse::from(feed))))
}

/// `GET /feeds` — List all feeds in creation order.
///
/// # Errors
///
/// Returns [`GatewayError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/feeds",
    tag = "Feeds",
    summary = "List feeds",
    description = "Returns every stored feed, oldest first.",
    responses(
        (status = 200, description = "Feed list", body = Vec<FeedResponse>),
    )
)]
pub async fn list_feeds(
    State(state): State<AppState>,
) -> Result<Json<Vec<FeedResponse>>, GatewayError> {
    let feeds = state.feed_service.list_feeds().await?;
    Ok(Json(feeds.into_iter().map(FeedResponse::from).collect()))
}

/// `GET /search?q=` — Full-text search over titles and descriptions.
///
/// # Errors
///
/// Returns [`GatewayError`] on a missing query or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/search",
    tag = "Feeds",
    summary = "Search feeds",
    description = "Fuzzy full-text search over feed titles and descriptions.",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching feeds", body = Vec<FeedResponse>),
        (status = 400, description = "Missing query", body = ErrorResponse),
    )
)]
pub async fn search_feeds(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<FeedResponse>>, GatewayError> {
    if params.q.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "query parameter q is required".to_string(),
        ));
    }

    let feeds = state.feed_service.search_feeds(&params.q).await?;
    Ok(Json(feeds.into_iter().map(FeedResponse::from).collect()))
}

/// Feed routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/feeds", axum::routing::post(create_feed).get(list_feeds))
        .route("/search", get(search_feeds))
}
