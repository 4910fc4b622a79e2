use reqwest::Client;

use crate::config::Config;

/// Shared relay state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Upstream HTTP client, reused across relayed requests.
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config, http: Client) -> Self {
        Self { config, http }
    }
}
