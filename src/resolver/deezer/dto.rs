//! Deezer API Data Transfer Objects
//!
//! These types match EXACTLY what the Deezer search API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the deezer module - convert to domain types.
//!
//! API Reference: https://developers.deezer.com/api/search

use serde::{Deserialize, Serialize};

/// Top-level search response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<TrackResult>,
    pub total: Option<u32>,
}

/// One track result
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackResult {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// Duration in seconds
    pub duration: Option<u32>,
    pub artist: Option<Artist>,
    pub album: Option<Album>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub name: String,
}

/// Album info with the cover size ladder Deezer exposes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Album {
    pub title: Option<String>,
    /// 56x56
    pub cover_small: Option<String>,
    /// 250x250
    pub cover_medium: Option<String>,
    /// 500x500
    pub cover_big: Option<String>,
    /// 1000x1000
    pub cover_xl: Option<String>,
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
        let json = r#"{"data": [], "total": 0}"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse empty");

        assert!(response.data.is_empty());
        assert_eq!(response.total, Some(0));
    }

    #[test]
    fn test_parse_track_result() {
        let json = r#"{
            "data": [{
                "id": 854914322,
                "readable": true,
                "title": "Shake It Off",
                "duration": 219,
                "rank": 897979,
                "artist": {"id": 12246, "name": "Taylor Swift", "type": "artist"},
                "album": {
                    "id": 100006,
                    "title": "1989",
                    "cover_small": "https://cdn.example/56x56.jpg",
                    "cover_medium": "https://cdn.example/250x250.jpg",
                    "cover_big": "https://cdn.example/500x500.jpg",
                    "cover_xl": "https://cdn.example/1000x1000.jpg",
                    "type": "album"
                },
                "type": "track"
            }],
            "total": 1
        }"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse track");

        let track = &response.data[0];
        assert_eq!(track.id, 854914322);
        assert_eq!(track.title, "Shake It Off");
        assert_eq!(track.duration, Some(219));
        assert_eq!(track.artist.as_ref().unwrap().name, "Taylor Swift");
        assert_eq!(track.album.as_ref().unwrap().title.as_deref(), Some("1989"));
    }

    #[test]
    fn test_parse_track_without_album() {
        let json = r#"{"data": [{"id": 1, "title": "Song"}]}"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse");

        assert!(response.data[0].album.is_none());
        assert!(response.data[0].artist.is_none());
    }
}
