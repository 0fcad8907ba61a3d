//! HTTP adjacency and node source for a venue-style REST API.
//!
//! - neighbors: `GET {base}/venues/{id}/nextvenues` → `response.nextVenues.items[]`
//! - node: `GET {base}/venues/{id}` → `response.venue`
//!
//! Both carry `client_id`, `client_secret` and `v` query parameters. The
//! request URL is stripped from transport errors so the secret never reaches
//! logs or event handlers.
//! 401/403 map to [`SourceError::Forbidden`]; every other failure is transient.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crawl_core::config::SourceConfig;
use crawl_core::errors::{ConfigError, SourceError};
use crawl_core::traits::{AdjacencySource, NodeSource};
use crawl_core::{Node, NodeId};

/// Longest response body excerpt carried in an error.
const MAX_BODY_EXCERPT: usize = 200;

#[derive(Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextVenuesResponse {
    next_venues: VenueList,
}

#[derive(Deserialize)]
struct VenueList {
    #[serde(default)]
    items: Vec<Venue>,
}

#[derive(Deserialize)]
struct VenueResponse {
    venue: Venue,
}

#[derive(Deserialize)]
struct Venue {
    id: String,
    #[serde(default)]
    name: String,
}

impl From<Venue> for Node {
    fn from(venue: Venue) -> Self {
        Node::new(venue.id, venue.name)
    }
}

/// Remote venue lookups over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    api_version: String,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.effective_timeout())
            .gzip(true)
            .build()
            .map_err(|e| ConfigError::ClientSetup {
                message: e.to_string(),
            })?;

        if config.client_id.is_none() || config.client_secret.is_none() {
            tracing::warn!("client credentials not configured; the API will likely reject requests");
        }

        Ok(Self {
            client,
            base_url: config.effective_base_url().to_string(),
            client_id: config.client_id.clone().unwrap_or_default(),
            client_secret: config.client_secret.clone().unwrap_or_default(),
            api_version: config.effective_api_version().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        node_id: &NodeId,
        url: &str,
    ) -> Result<T, SourceError> {
        let response = self
            .client
            .get(url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("v", self.api_version.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                SourceError::transient(
                    node_id.as_str(),
                    format!("request failed: {}", e.without_url()),
                )
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::forbidden(
                node_id.as_str(),
                status.as_u16(),
                excerpt(&body),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::transient(
                node_id.as_str(),
                format!("HTTP {}: {}", status.as_u16(), excerpt(&body)),
            ));
        }

        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            SourceError::transient(
                node_id.as_str(),
                format!("undecodable response: {}", e.without_url()),
            )
        })?;
        Ok(envelope.response)
    }
}

impl AdjacencySource for HttpSource {
    async fn lookup_neighbors(&self, node_id: &NodeId) -> Result<Vec<Node>, SourceError> {
        let url = format!("{}/venues/{}/nextvenues", self.base_url, node_id);
        let body: NextVenuesResponse = self.get_json(node_id, &url).await?;
        tracing::trace!(node_id = %node_id, count = body.next_venues.items.len(), "neighbors fetched");
        Ok(body.next_venues.items.into_iter().map(Node::from).collect())
    }
}

impl NodeSource for HttpSource {
    async fn lookup_node(&self, node_id: &NodeId) -> Result<Node, SourceError> {
        let url = format!("{}/venues/{}", self.base_url, node_id);
        let body: VenueResponse = self.get_json(node_id, &url).await?;
        Ok(body.venue.into())
    }
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}
