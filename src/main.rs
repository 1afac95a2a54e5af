//! feedcast server entry point.
//!
//! Wires the collaborators together: PostgreSQL, Elasticsearch, the NATS
//! event bus, the WebSocket hub, and the Axum HTTP server. Connection
//! failures here are fatal; nothing is retried at startup.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use feedcast::api;
use feedcast::app_state::AppState;
use feedcast::config::GatewayConfig;
use feedcast::domain::Feed;
use feedcast::events::{EventBus, FeedCreatedMessage};
use feedcast::persistence::PostgresFeedRepository;
use feedcast::search::{ElasticSearchIndex, SearchIndex};
use feedcast::service::FeedService;
use feedcast::ws::handler::ws_handler;
use feedcast::ws::{Hub, PushMessage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env().map_err(|err| anyhow::anyhow!(err.to_string()))?;
    tracing::info!(addr = %config.listen_addr, "starting feedcast gateway");

    // External collaborators: storage, search, broker
    let repository = Arc::new(PostgresFeedRepository::connect(&config).await?);
    let search = Arc::new(ElasticSearchIndex::new(&config.elasticsearch_url));
    let event_bus = EventBus::connect(&config.nats_url, config.event_channel_capacity).await?;

    // Connection hub and its dispatch loop
    let (hub, dispatcher) = Hub::new(config.connection_queue_capacity);
    tokio::spawn(dispatcher.run());

    // Search indexer: callback subscription. Indexing is I/O, so it is
    // handed off to its own task immediately rather than run on the
    // delivery path.
    {
        let search = Arc::clone(&search);
        event_bus
            .subscribe_callback(move |message: FeedCreatedMessage| {
                let search = Arc::clone(&search);
                tokio::spawn(async move {
                    let feed = Feed::from(message);
                    if let Err(err) = search.index_feed(&feed).await {
                        tracing::error!(%err, feed_id = %feed.id, "failed to index feed");
                    }
                });
            })
            .await?;
    }

    // WebSocket pusher: channel subscription drained into the hub.
    {
        let mut created = event_bus.subscribe_channel::<FeedCreatedMessage>().await?;
        let hub = hub.clone();
        tokio::spawn(async move {
            while let Some(message) = created.recv().await {
                hub.broadcast(PushMessage::from(message), None).await;
            }
            tracing::debug!("feed push loop stopped");
        });
    }

    // Service and shared state
    let feed_service = Arc::new(FeedService::new(
        repository,
        search,
        Arc::new(event_bus.clone()),
    ));
    let app_state = AppState { feed_service, hub };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    event_bus.close().await;
    tracing::info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
