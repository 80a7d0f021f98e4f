//! Server configuration from environment.

use std::env;
use std::time::Duration;

pub const DEFAULT_ROUTING_URL: &str = "https://api.tomtom.com/routing/1/calculateRoute";
pub const DEFAULT_TRAFFIC_URL: &str =
    "https://api.tomtom.com/traffic/services/4/incidentDetails/s3";
pub const DEFAULT_WAQI_URL: &str = "https://api.waqi.info/feed/geo";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub tomtom_api_key: String,
    pub waqi_token: String,
    pub routing_url: String,
    pub traffic_url: String,
    pub waqi_url: String,
    pub upstream_timeout_s: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            tomtom_api_key: String::new(),
            waqi_token: String::new(),
            routing_url: DEFAULT_ROUTING_URL.to_string(),
            traffic_url: DEFAULT_TRAFFIC_URL.to_string(),
            waqi_url: DEFAULT_WAQI_URL.to_string(),
            upstream_timeout_s: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("ROUTESCOPE_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            tomtom_api_key: env::var("TOMTOM_API_KEY").unwrap_or_default(),
            waqi_token: env::var("WAQI_TOKEN").unwrap_or_default(),
            routing_url: env::var("TOMTOM_ROUTING_URL").unwrap_or(defaults.routing_url),
            traffic_url: env::var("TOMTOM_TRAFFIC_URL").unwrap_or(defaults.traffic_url),
            waqi_url: env::var("WAQI_URL").unwrap_or(defaults.waqi_url),
            upstream_timeout_s: env::var("UPSTREAM_TIMEOUT_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.upstream_timeout_s),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_s.max(1))
    }
}
