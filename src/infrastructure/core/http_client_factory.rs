use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a plain HTTP client bounded by `timeout`.
    ///
    /// No retry middleware is installed: snapshot fetches are single-shot.
    pub fn create_client(timeout: Duration) -> Result<Client> {
        Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(concat!("spotrank/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")
    }
}
