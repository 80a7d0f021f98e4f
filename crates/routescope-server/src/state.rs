//! Shared handler state.

use crate::config::Config;
use crate::upstream::UpstreamClient;

pub struct AppState {
    pub config: Config,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let upstream = UpstreamClient::new(&config);
        Self { config, upstream }
    }
}
