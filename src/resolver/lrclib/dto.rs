//! LRCLIB API Data Transfer Objects
//!
//! These types match EXACTLY what the LRCLIB search API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the lrclib module - convert to domain types.
//!
//! API Reference: https://lrclib.net/docs

use serde::{Deserialize, Serialize};

/// The search endpoint returns a bare JSON array of results.
pub type SearchResponse = Vec<SearchResult>;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: u64,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    /// Duration in seconds
    pub duration: Option<f64>,
    pub instrumental: Option<bool>,
    pub plain_lyrics: Option<String>,
    pub synced_lyrics: Option<String>,
}

impl SearchResult {
    /// Whether this entry actually carries lyrics worth referencing.
    pub fn has_lyrics(&self) -> bool {
        let non_empty = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.trim().is_empty());
        non_empty(&self.synced_lyrics) || non_empty(&self.plain_lyrics)
    }
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_empty_response() {
        let response: SearchResponse = serde_json::from_str("[]").expect("Should parse empty");
        assert!(response.is_empty());
    }

    #[test]
    fn test_parse_search_result() {
        let json = r#"[{
            "id": 3396226,
            "name": "Shake It Off",
            "trackName": "Shake It Off",
            "artistName": "Taylor Swift",
            "albumName": "1989",
            "duration": 219.2,
            "instrumental": false,
            "plainLyrics": "I stay out too late...",
            "syncedLyrics": "[00:00.12] I stay out too late..."
        }]"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse result");

        let hit = &response[0];
        assert_eq!(hit.id, 3396226);
        assert_eq!(hit.track_name.as_deref(), Some("Shake It Off"));
        assert_eq!(hit.artist_name.as_deref(), Some("Taylor Swift"));
        assert!(hit.has_lyrics());
    }

    #[test]
    fn test_instrumental_without_lyrics() {
        let json = r#"[{
            "id": 1,
            "trackName": "Interlude",
            "artistName": "Somebody",
            "instrumental": true,
            "plainLyrics": null,
            "syncedLyrics": null
        }]"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse");

        assert!(!response[0].has_lyrics());
    }
}
