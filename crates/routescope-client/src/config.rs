//! Client configuration from environment.

use std::env;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_GEOCODE_URL: &str = "https://api.tomtom.com/search/2/search";
pub const DEFAULT_SUMMARY_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    pub weather_url: String,
    pub geocode_url: String,
    pub geocode_api_key: String,
    pub summary_url: String,
    pub summary_api_key: String,
    pub http_timeout_s: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            geocode_api_key: String::new(),
            summary_url: DEFAULT_SUMMARY_URL.to_string(),
            summary_api_key: String::new(),
            http_timeout_s: 15,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url: env::var("ROUTESCOPE_BACKEND_URL").unwrap_or(defaults.backend_url),
            weather_url: env::var("ROUTESCOPE_WEATHER_URL").unwrap_or(defaults.weather_url),
            geocode_url: env::var("ROUTESCOPE_GEOCODE_URL").unwrap_or(defaults.geocode_url),
            geocode_api_key: env::var("TOMTOM_API_KEY").unwrap_or_default(),
            summary_url: env::var("ROUTESCOPE_SUMMARY_URL").unwrap_or(defaults.summary_url),
            summary_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            http_timeout_s: env::var("ROUTESCOPE_HTTP_TIMEOUT_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.http_timeout_s),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_s.max(1))
    }

    /// Summary generation needs an API key; without one it is skipped.
    pub fn summary_enabled(&self) -> bool {
        !self.summary_api_key.trim().is_empty()
    }
}
