//! iTunes Search API Data Transfer Objects
//!
//! These types match EXACTLY what the iTunes Search API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the itunes module - convert to domain types.
//!
//! API Reference: https://developer.apple.com/library/archive/documentation/AudioVideo/Conceptual/iTuneSearchAPI/

use serde::{Deserialize, Serialize};

/// Top-level search response
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub result_count: u32,
    #[serde(default)]
    pub results: Vec<TrackResult>,
}

/// One song result. Every field is optional because the API mixes entity
/// kinds in one result array and omits fields freely.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResult {
    pub track_id: Option<u64>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub collection_name: Option<String>,
    /// Duration in milliseconds
    pub track_time_millis: Option<u64>,
    /// ISO-8601 timestamp, e.g. "2014-08-18T07:00:00Z"
    pub release_date: Option<String>,
    pub primary_genre_name: Option<String>,
    pub track_number: Option<u32>,
    pub track_count: Option<u32>,
    /// 100x100 artwork thumbnail URL
    pub artwork_url100: Option<String>,
    /// 60x60 artwork thumbnail URL
    pub artwork_url60: Option<String>,
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
        let json = r#"{"resultCount": 0, "results": []}"#;

        let response: SearchResponse =
            serde_json::from_str(json).expect("Should parse empty response");

        assert_eq!(response.result_count, 0);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_parse_song_result() {
        let json = r#"{
            "resultCount": 1,
            "results": [{
                "wrapperType": "track",
                "kind": "song",
                "trackId": 907242710,
                "trackName": "Shake It Off",
                "artistName": "Taylor Swift",
                "collectionName": "1989",
                "trackTimeMillis": 219209,
                "releaseDate": "2014-08-18T07:00:00Z",
                "primaryGenreName": "Pop",
                "trackNumber": 6,
                "trackCount": 13,
                "artworkUrl100": "https://is1-ssl.mzstatic.com/image/thumb/Music/v4/ab/cd/ef/source/100x100bb.jpg",
                "country": "USA",
                "currency": "USD"
            }]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse song");

        let track = &response.results[0];
        assert_eq!(track.track_id, Some(907242710));
        assert_eq!(track.track_name.as_deref(), Some("Shake It Off"));
        assert_eq!(track.artist_name.as_deref(), Some("Taylor Swift"));
        assert_eq!(track.collection_name.as_deref(), Some("1989"));
        assert_eq!(track.track_time_millis, Some(219209));
        assert!(track.artwork_url100.as_deref().unwrap().ends_with("100x100bb.jpg"));
    }

    #[test]
    fn test_parse_sparse_result() {
        // non-song entities carry almost none of our fields
        let json = r#"{"resultCount": 1, "results": [{"wrapperType": "collection"}]}"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse sparse");

        let track = &response.results[0];
        assert!(track.track_name.is_none());
        assert!(track.artist_name.is_none());
    }
}
