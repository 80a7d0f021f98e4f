//! Client for the routing backend (`/route`, `/air-quality`, `/traffic-incidents`).

use crate::http::{build_client, send_json};
use routescope_core::{
    AirQualityReading, AnnotationError, AnnotationKind, AnnotationProvider, BoundingBox, Point,
    RouteError, RouteResponse, TrafficIncident, TrafficResponse, VehicleType,
};
use std::time::Duration;

/// HTTP client for the routing backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(build_client(timeout), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request a route between two points.
    pub async fn route(
        &self,
        source: Point,
        destination: Point,
        vehicle: VehicleType,
    ) -> Result<RouteResponse, RouteError> {
        let url = format!("{}/route", self.base_url);
        let request = self.client.get(&url).query(&[
            ("source", source.to_string()),
            ("destination", destination.to_string()),
            ("vehicle_type", vehicle.to_string()),
        ]);
        let response: RouteResponse = send_json(request).await?;
        Ok(response)
    }

    /// Nearest air-quality station reading for a point.
    pub async fn air_quality(&self, point: Point) -> Result<AirQualityReading, AnnotationError> {
        let url = format!("{}/air-quality", self.base_url);
        let request = self.client.get(&url).query(&[
            ("lat", point.lat.to_string()),
            ("lon", point.lon.to_string()),
        ]);
        let body: serde_json::Value = send_json(request).await?;
        AirQualityReading::from_json(body)
    }

    /// Current traffic incidents inside a bounding box.
    pub async fn traffic_incidents(
        &self,
        bounding_box: &BoundingBox,
    ) -> Result<Vec<TrafficIncident>, AnnotationError> {
        let url = format!("{}/traffic-incidents", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("bounding_box", bounding_box.to_string())]);
        let response: TrafficResponse = send_json(request).await?;
        Ok(response.into_incidents())
    }
}

/// Air-quality annotation layer backed by [`BackendClient::air_quality`].
#[derive(Debug, Clone)]
pub struct AirQualityProvider {
    backend: BackendClient,
}

impl AirQualityProvider {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

impl AnnotationProvider for AirQualityProvider {
    type Payload = AirQualityReading;

    fn kind(&self) -> AnnotationKind {
        AnnotationKind::AirQuality
    }

    async fn lookup(&self, point: Point) -> Result<AirQualityReading, AnnotationError> {
        self.backend.air_quality(point).await
    }
}
