//! MusicBrainz API Data Transfer Objects
//!
//! These types match EXACTLY what the MusicBrainz recording search returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the musicbrainz module - convert to domain types.
//!
//! API Reference: https://musicbrainz.org/doc/MusicBrainz_API/Search

use serde::{Deserialize, Serialize};

/// Recording search response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub recordings: Vec<Recording>,
    pub count: Option<u32>,
}

/// One recording hit
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Recording {
    /// MusicBrainz recording ID
    pub id: String,
    pub title: Option<String>,
    /// Duration in milliseconds
    pub length: Option<u64>,
    /// Search relevance score (0-100), assigned by the search server
    pub score: Option<u32>,
    /// Earliest known release date (YYYY, YYYY-MM, or YYYY-MM-DD)
    pub first_release_date: Option<String>,
    #[serde(default)]
    pub isrcs: Vec<String>,
    #[serde(default)]
    pub artist_credit: Vec<ArtistCredit>,
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// Artist credit (can be multiple for collaborations)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistCredit {
    /// How this artist is credited (may differ from official name)
    pub name: Option<String>,
    /// Join phrase (e.g., " & ", " feat. ")
    pub joinphrase: Option<String>,
    pub artist: Option<Artist>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    /// MusicBrainz artist ID
    pub id: String,
    pub name: String,
    pub disambiguation: Option<String>,
}

/// Release (album) a recording appears on
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Release {
    /// MusicBrainz release ID
    pub id: String,
    pub title: Option<String>,
    /// Release status (Official, Bootleg, ...)
    pub status: Option<String>,
    #[serde(default)]
    pub artist_credit: Vec<ArtistCredit>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// ============================================================================
