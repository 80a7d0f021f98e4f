//! Open-Meteo hourly forecast client.

use crate::http::{build_client, send_json};
use routescope_core::{AnnotationError, AnnotationKind, AnnotationProvider, Point, WeatherSample};
use std::time::Duration;

const HOURLY_FIELDS: &str = "temperature_2m,weathercode";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(build_client(timeout), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Temperature and weather code for the current hour at `point`.
    pub async fn current_hour(&self, point: Point) -> Result<WeatherSample, AnnotationError> {
        let request = self.client.get(&self.base_url).query(&[
            ("latitude", point.lat.to_string()),
            ("longitude", point.lon.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
        ]);
        let body: serde_json::Value = send_json(request).await?;
        WeatherSample::from_json(body)
    }
}

impl AnnotationProvider for OpenMeteoClient {
    type Payload = WeatherSample;

    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Weather
    }

    async fn lookup(&self, point: Point) -> Result<WeatherSample, AnnotationError> {
        self.current_hour(point).await
    }
}
