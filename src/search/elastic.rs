//! Elasticsearch implementation of the search index.
//!
//! Talks to the Elasticsearch HTTP API directly with `reqwest`. Documents
//! live in the `feeds` index; indexing uses `refresh=wait_for` so a
//! just-indexed feed is immediately searchable.

use async_trait::async_trait;
use serde::Deserialize;

use super::SearchIndex;
use crate::domain::Feed;
use crate::error::GatewayError;

/// Fuzziness applied to full-text queries.
const QUERY_FUZZINESS: u32 = 3;

/// Elasticsearch-backed search index.
#[derive(Debug, Clone)]
pub struct ElasticSearchIndex {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: Feed,
}

impl ElasticSearchIndex {
    /// Creates a search index client for the given Elasticsearch base URL
    /// (e.g. `http://localhost:9200`).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchIndex for ElasticSearchIndex {
    async fn index_feed(&self, feed: &Feed) -> Result<(), GatewayError> {
        let url = format!(
            "{}/feeds/_doc/{}?refresh=wait_for",
            self.base_url, feed.id
        );
        let response = self
            .http
            .put(url)
            .json(feed)
            .send()
            .await
            .map_err(|err| GatewayError::Search(err.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Search(format!(
                "index request returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn search_feeds(&self, query: &str) -> Result<Vec<Feed>, GatewayError> {
        let body = serde_json::json!({
            "query": {
                "multi_match": {
                    "query": query,
                    "fields": ["title", "description"],
                    "fuzziness": QUERY_FUZZINESS,
                }
            }
        });

        let response = self
            .http
            .post(format!("{}/feeds/_search", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|err| GatewayError::Search(err.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Search(format!(
                "search request returned {}",
                response.status()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::Search(err.to_string()))?;

        Ok(parsed.hits.hits.into_iter().map(|hit| hit.source).collect())
    }
}
