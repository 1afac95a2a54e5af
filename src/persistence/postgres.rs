//! PostgreSQL implementation of the feed repository.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::FeedRepository;
use crate::config::GatewayConfig;
use crate::domain::{Feed, FeedId};
use crate::error::GatewayError;

/// PostgreSQL-backed feed repository using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresFeedRepository {
    pool: PgPool,
}

impl PostgresFeedRepository {
    /// Creates a repository over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to PostgreSQL using the pool settings from `config` and
    /// applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Connection`] if the database is unreachable
    /// or a migration fails. Fatal to startup; not retried here.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|err| GatewayError::Connection(err.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|err| GatewayError::Connection(err.to_string()))?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl FeedRepository for PostgresFeedRepository {
    async fn insert_feed(&self, feed: &Feed) -> Result<(), GatewayError> {
        sqlx::query("INSERT INTO feeds (id, title, description, created_at) VALUES ($1, $2, $3, $4)")
            .bind(feed.id.as_uuid())
            .bind(&feed.title)
            .bind(&feed.description)
            .bind(feed.created_at)
            .execute(&self.pool)
            .await
            .map_err(|err| GatewayError::Repository(err.to_string()))?;
        Ok(())
    }

    async fn list_feeds(&self) -> Result<Vec<Feed>, GatewayError> {
        let rows = sqlx::query_as::<_, (uuid::Uuid, String, String, DateTime<Utc>)>(
            "SELECT id, title, description, created_at FROM feeds ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| GatewayError::Repository(err.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, title, description, created_at)| Feed {
                id: FeedId::from_uuid(id),
                title,
                description,
                created_at,
            })
            .collect())
    }
}
