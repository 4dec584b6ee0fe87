// Search client — one `reddit/search/submission` request per `fetch`.
//
// Modeled on a thin reqwest wrapper, but the HTTP call goes through the
// injected `Transport` so status handling and 429 retries can be tested
// without a network.

use anyhow::Result;
use tracing::debug;

use super::error::FetchError;
use super::models::{SearchQuery, SearchResponse, Submission};
use super::retry::{with_retry, RetryPolicy};
use super::transport::{HttpTransport, Transport};

/// Default public API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.pushshift.io/";

/// Path of the submission search endpoint, relative to the base URL.
pub const SEARCH_ENDPOINT: &str = "reddit/search/submission";

/// Client for the submission search endpoint.
pub struct SearchClient {
    transport: Box<dyn Transport>,
    base_url: String,
    retry: RetryPolicy,
}

impl SearchClient {
    /// Create a client that talks HTTP to `base_url`.
    pub fn new(base_url: &str, retry: RetryPolicy) -> Result<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(Box::new(transport), base_url, retry))
    }

    /// Create a client over any transport. Tests pass a scripted one.
    pub fn with_transport(transport: Box<dyn Transport>, base_url: &str, retry: RetryPolicy) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    pub fn endpoint_url(&self) -> String {
        format!("{}/{}", self.base_url, SEARCH_ENDPOINT)
    }

    /// Run one search and return the `data` array.
    ///
    /// 429 responses are retried per the client's `RetryPolicy`; every other
    /// failure is returned as-is.
    pub async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Submission>, FetchError> {
        let url = self.endpoint_url();
        let params = query.to_params();

        let submissions = with_retry(&self.retry, || self.request_once(&url, &params)).await?;

        debug!(
            count = submissions.len(),
            subreddit = query.subreddit.as_deref().unwrap_or(""),
            author = query.author.as_deref().unwrap_or(""),
            "Search returned submissions"
        );

        Ok(submissions)
    }

    async fn request_once(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<Vec<Submission>, FetchError> {
        let response = self.transport.get(url, params).await?;

        match response.status {
            200 => serde_json::from_str::<SearchResponse>(&response.body)
                .map(|page| page.data)
                .map_err(|e| FetchError::Decode(e.to_string())),
            429 => Err(FetchError::RateLimited),
            status => Err(FetchError::Status { status }),
        }
    }
}
