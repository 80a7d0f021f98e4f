//! routescope client - HTTP access to the routing backend and annotation providers
//!
//! Wraps every remote collaborator of the route view behind a small async
//! client and drives a full route request through [`RoutePlanner`].

pub mod backend;
pub mod config;
pub mod geocode;
mod http;
pub mod planner;
pub mod speech;
pub mod summary;
pub mod weather;

pub use backend::{AirQualityProvider, BackendClient};
pub use config::ClientConfig;
pub use geocode::GeocodeClient;
pub use planner::{Place, RoutePlanner, RouteRequest};
pub use speech::{ConsoleSpeech, SpeechSink};
pub use summary::SummaryClient;
pub use weather::OpenMeteoClient;
