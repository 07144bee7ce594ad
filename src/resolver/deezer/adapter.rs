//! Adapter layer: Convert Deezer DTOs to domain models
//!
//! This is the ONLY place where Deezer DTO types are converted to domain
//! types.

use super::dto;
use crate::resolver::domain::{Candidate, CoverArtRef, ProviderId};

pub fn to_candidates(response: dto::SearchResponse) -> Vec<Candidate> {
    response.data.into_iter().map(to_candidate).collect()
}

fn to_candidate(track: dto::TrackResult) -> Candidate {
    let cover_art = track.album.as_ref().and_then(cover_ref);
    Candidate {
        provider_id: Some(ProviderId::Deezer),
        source_id: track.id.to_string(),
        title: track.title,
        artist: track.artist.map(|a| a.name).unwrap_or_default(),
        album: track.album.and_then(|a| a.title).filter(|s| !s.is_empty()),
        // the search payload carries no release date; year stays unknown
        release_year: None,
        genre: None,
        isrc: None,
        cover_art,
        lyrics: None,
    }
}

/// Pick the largest cover on the album's size ladder.
fn cover_ref(album: &dto::Album) -> Option<CoverArtRef> {
    let ladder = [
        (&album.cover_xl, 1000),
        (&album.cover_big, 500),
        (&album.cover_medium, 250),
        (&album.cover_small, 56),
    ];
    ladder.iter().find_map(|(url, size)| {
        url.as_ref()
            .filter(|u| !u.is_empty())
            .map(|u| CoverArtRef {
                url: u.clone(),
                size: *size,
            })
    })
}
