//! Address suggestions from the TomTom search API.

use crate::http::{build_client, send_json};
use anyhow::{Context, Result};
use reqwest::Url;
use routescope_core::{Point, Suggestion};
use serde::Deserialize;
use std::time::Duration;

const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    address: SearchAddress,
    position: SearchPosition,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchAddress {
    freeform_address: String,
}

#[derive(Debug, Deserialize)]
struct SearchPosition {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeocodeClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Up to five matches for a free-text query.
    pub async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = search_url(&self.base_url, query)?;
        let request = self.client.get(url).query(&[
            ("key", self.api_key.clone()),
            ("limit", SUGGESTION_LIMIT.to_string()),
        ]);
        let response: SearchResponse = send_json(request)
            .await
            .with_context(|| format!("geocoding '{}' failed", query))?;

        Ok(response
            .results
            .into_iter()
            .map(|result| Suggestion {
                name: result.address.freeform_address,
                point: Point::new(result.position.lat, result.position.lon),
            })
            .collect())
    }
}

/// `{base}/{query}.json` with the query percent-encoded as one path segment.
fn search_url(base: &str, query: &str) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("invalid geocoding URL {}", base))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("geocoding URL cannot be a base: {}", base))?
        .pop_if_empty()
        .push(&format!("{}.json", query));
    Ok(url)
}
