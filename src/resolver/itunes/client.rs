//! iTunes Search API HTTP client
//!
//! No authentication required. The `country` parameter maps to the user's
//! `market:` query hint.

use super::{adapter, dto};
use crate::resolver::domain::{Candidate, ProviderError, Query};

/// iTunes Search API client
pub struct ItunesClient {
    http_client: reqwest::Client,
    base_url: String,
}

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

impl ItunesClient {
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://itunes.apple.com/search".to_string(),
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

    /// Search for songs matching the query.
    ///
    /// Zero results is a valid empty list, not an error.
    pub async fn search(
        &self,
        query: &Query,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let response = self.send_search_request(query, max_results).await?;
        Ok(adapter::to_candidates(response))
    }

    async fn send_search_request(
        &self,
        query: &Query,
        max_results: usize,
    ) -> Result<dto::SearchResponse, ProviderError> {
        let mut request = self.http_client.get(&self.base_url).query(&[
            ("term", query.search_term()),
            ("entity", "song".to_string()),
            ("limit", max_results.to_string()),
        ]);
        if let Some(ref market) = query.market {
            request = request.query(&[("country", market)]);
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

impl Default for ItunesClient {
    fn default() -> Self {
        Self::new()
    }
}
