// HTTP transport seam for the search client.
//
// `SearchClient` owns a `Box<dyn Transport>`. Production code uses the
// reqwest-backed `HttpTransport`; tests script responses with their own impl.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::error::FetchError;

/// Status code and body of one HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Issues GET requests. Implementations report transport-level failures as
/// `FetchError::Connection` and leave status handling to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, params: &[(&'static str, String)])
        -> Result<RawResponse, FetchError>;
}

/// reqwest-backed transport used against the real API.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                "subreddit-overlap/",
                env!("CARGO_PKG_VERSION"),
                " (overlap-analysis)"
            ))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<RawResponse, FetchError> {
        debug!(url = url, params = ?params, "Search API GET request");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}
