//! reqwest-backed [`Fetcher`].

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::{FetchError, FetchResponse, Fetcher};

/// HTTP GET fetcher with an optional per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher. `timeout = None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        debug!(event = "core.fetch.request_started", url = url);

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(
            event = "core.fetch.request_completed",
            url = url,
            status = status,
            bytes = body.len()
        );
        Ok(FetchResponse { status, body })
    }
}
