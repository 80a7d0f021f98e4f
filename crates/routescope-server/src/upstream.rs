//! Calls to the routing, traffic and air-quality providers.
//!
//! Bodies are passed through as raw JSON; the client decodes them.

use crate::config::Config;
use reqwest::RequestBuilder;
use routescope_core::{Point, VehicleType};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },
    #[error("{service} returned an unreadable body: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    routing_url: String,
    traffic_url: String,
    waqi_url: String,
    tomtom_api_key: String,
    waqi_token: String,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout())
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!("Falling back to default HTTP client: {}", err);
                reqwest::Client::new()
            });
        Self {
            client,
            routing_url: config.routing_url.trim_end_matches('/').to_string(),
            traffic_url: config.traffic_url.trim_end_matches('/').to_string(),
            waqi_url: config.waqi_url.trim_end_matches('/').to_string(),
            tomtom_api_key: config.tomtom_api_key.clone(),
            waqi_token: config.waqi_token.clone(),
        }
    }

    /// TomTom route with coded instructions and the polyline representation.
    pub async fn route(
        &self,
        source: Point,
        destination: Point,
        vehicle: VehicleType,
    ) -> Result<Value, UpstreamError> {
        let url = format!("{}/{}:{}/json", self.routing_url, source, destination);
        let request = self.client.get(url).query(&[
            ("key", self.tomtom_api_key.as_str()),
            ("instructionsType", "coded"),
            ("routeRepresentation", "polyline"),
            ("travelMode", vehicle.as_str()),
        ]);
        get_json("routing", request).await
    }

    /// WAQI feed of the station nearest to `lat`/`lon`.
    pub async fn air_quality(&self, lat: f64, lon: f64) -> Result<Value, UpstreamError> {
        let url = format!("{}:{};{}/", self.waqi_url, lat, lon);
        let request = self
            .client
            .get(url)
            .query(&[("token", self.waqi_token.as_str())]);
        get_json("air quality", request).await
    }

    /// TomTom incident details inside `south,west,north,east`.
    pub async fn traffic_incidents(&self, bounding_box: &str) -> Result<Value, UpstreamError> {
        // zoom 22, traffic model -1 (latest)
        let url = format!("{}/{}/22/-1/json", self.traffic_url, bounding_box);
        let request = self.client.get(url).query(&[
            ("key", self.tomtom_api_key.as_str()),
            ("projection", "EPSG4326"),
            ("originalPosition", "true"),
        ]);
        get_json("traffic", request).await
    }
}

async fn get_json(service: &'static str, request: RequestBuilder) -> Result<Value, UpstreamError> {
    // without_url keeps provider keys out of error messages
    let response = request.send().await.map_err(|source| UpstreamError::Request {
        service,
        source: source.without_url(),
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(service, status = status.as_u16(), "Upstream returned an error status");
        return Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
        });
    }

    response.json::<Value>().await.map_err(|source| UpstreamError::Decode {
        service,
        source: source.without_url(),
    })
}
