//! Adapter layer: Convert LRCLIB DTOs to domain models
//!
//! This is the ONLY place where LRCLIB DTO types are converted to domain
//! types. The candidate carries an opaque locator for the lyrics, never the
//! lyric text itself.

use super::dto;
use crate::resolver::domain::{Candidate, LyricsRef, ProviderId};

pub fn to_candidates(response: dto::SearchResponse) -> Vec<Candidate> {
    response.into_iter().map(to_candidate).collect()
}

fn to_candidate(result: dto::SearchResult) -> Candidate {
    let lyrics = result.has_lyrics().then(|| LyricsRef {
        provider: ProviderId::Lrclib,
        locator: format!("https://lrclib.net/api/get/{}", result.id),
    });

    Candidate {
        provider_id: Some(ProviderId::Lrclib),
        source_id: result.id.to_string(),
        title: result.track_name.unwrap_or_default(),
        artist: result.artist_name.unwrap_or_default(),
        album: result.album_name.filter(|s| !s.is_empty()),
        release_year: None,
        genre: None,
        isrc: None,
        cover_art: None,
        lyrics,
    }
}
