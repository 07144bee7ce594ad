//! MusicBrainz HTTP client
//!
//! Searches recordings with a Lucene query over the web service.
//! See: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! IMPORTANT: MusicBrainz requires a User-Agent header and rate limits to 1 req/sec.

use super::{adapter, dto};
use crate::resolver::domain::{Candidate, ProviderError, Query};

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
}

/// User agent string - MusicBrainz requires this
const USER_AGENT: &str = concat!(
    "songgrab/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/songgrab)"
);

impl MusicBrainzClient {
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://musicbrainz.org/ws/2".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Search recordings matching the query.
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
        let url = format!("{}/recording", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", lucene_query(query)),
                ("fmt", "json".to_string()),
                ("limit", max_results.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        {
            // MusicBrainz reports rate limiting as 503 as well as 429
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

impl Default for MusicBrainzClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the Lucene search query: `recording:"title" artist:"artist"`.
fn lucene_query(query: &Query) -> String {
    let mut q = format!("recording:\"{}\"", escape_quotes(&query.title));
    if let Some(ref artist) = query.artist {
        q.push_str(&format!(" artist:\"{}\"", escape_quotes(artist)));
    }
    q
}

fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = MusicBrainzClient::new();
        assert_eq!(client.base_url, "https://musicbrainz.org/ws/2");
    }

    #[test]
    fn test_lucene_query_with_artist() {
        let q = Query::new("Shake It Off", Some("Taylor Swift".into()));
        assert_eq!(
            lucene_query(&q),
            "recording:\"Shake It Off\" artist:\"Taylor Swift\""
        );
    }

    #[test]
    fn test_lucene_query_title_only() {
        let q = Query::new("Shake It Off", None);
        assert_eq!(lucene_query(&q), "recording:\"Shake It Off\"");
    }

    #[test]
    fn test_quotes_are_escaped() {
        let q = Query::new("The \"Song\"", None);
        assert_eq!(lucene_query(&q), "recording:\"The \\\"Song\\\"\"");
    }

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("songgrab/"));
    }
}
