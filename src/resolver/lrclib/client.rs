//! LRCLIB HTTP client
//!
//! Free lyrics database, no API key. The project asks clients to send a
//! descriptive User-Agent.
//!
//! See: https://lrclib.net/docs

use super::{adapter, dto};
use crate::resolver::domain::{Candidate, ProviderError, Query};

/// LRCLIB API client
pub struct LrclibClient {
    http_client: reqwest::Client,
    base_url: String,
}

const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/songgrab)"
);

impl LrclibClient {
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://lrclib.net/api/search".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Search for lyrics entries matching the query.
    ///
    /// Zero results is a valid empty list, not an error. LRCLIB has no limit
    /// parameter; `max_results` truncates client-side.
    pub async fn search(
        &self,
        query: &Query,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let mut response = self.send_search_request(query).await?;
        response.truncate(max_results);
        Ok(adapter::to_candidates(response))
    }

    async fn send_search_request(&self, query: &Query) -> Result<dto::SearchResponse, ProviderError> {
        let mut request = self
            .http_client
            .get(&self.base_url)
            .query(&[("track_name", query.title.as_str())]);
        if let Some(ref artist) = query.artist {
            request = request.query(&[("artist_name", artist.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        if !status.is_success() {
            return Err(ProviderError::Http(format!(
                "{}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<dto::SearchResponse>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

impl Default for LrclibClient {
    fn default() -> Self {
        Self::new()
    }
}
