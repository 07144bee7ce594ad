//! Adapter layer: Convert MusicBrainz DTOs to domain models
//!
//! This is the ONLY place where MusicBrainz DTO types are converted to
//! domain types.

use super::dto;
use crate::resolver::domain::{Candidate, CoverArtRef, ProviderId};

/// MusicBrainz artist id for the "Various Artists" placeholder.
const VARIOUS_ARTISTS_MBID: &str = "89ad4ac3-39f7-470e-963a-56509c546377";

pub fn to_candidates(response: dto::SearchResponse) -> Vec<Candidate> {
    response
        .recordings
        .into_iter()
        .filter(|r| r.title.is_some())
        .map(to_candidate)
        .collect()
}

fn to_candidate(recording: dto::Recording) -> Candidate {
    let artist = build_artist_string(&recording.artist_credit);
    let release = pick_release(&recording.releases);

    let album = release
        .and_then(|r| r.title.clone())
        .filter(|s| !s.is_empty());
    // Cover Art Archive serves the front image by release MBID; the core
    // only carries the reference, the fetch collaborator resolves it.
    let cover_art = release.map(|r| CoverArtRef {
        url: format!("https://coverartarchive.org/release/{}/front", r.id),
        size: 0,
    });

    Candidate {
        provider_id: Some(ProviderId::MusicBrainz),
        source_id: recording.id,
        title: recording.title.unwrap_or_default(),
        artist,
        album,
        release_year: recording
            .first_release_date
            .as_deref()
            .and_then(parse_year),
        genre: None,
        isrc: recording.isrcs.into_iter().next(),
        cover_art,
        lyrics: None,
    }
}

/// Build a combined artist string from artist credits, preserving join
/// phrases ("A & B", "A feat. B").
fn build_artist_string(credits: &[dto::ArtistCredit]) -> String {
    let mut result = String::new();
    for credit in credits {
        let name = credit
            .name
            .as_deref()
            .or(credit.artist.as_ref().map(|a| a.name.as_str()))
            .unwrap_or_default();
        result.push_str(name);
        if let Some(ref join) = credit.joinphrase {
            result.push_str(join);
        }
    }
    result
}

/// Pick the release the album field should come from: the first one that is
/// not a Various-Artists compilation, falling back to the first release.
fn pick_release(releases: &[dto::Release]) -> Option<&dto::Release> {
    releases
        .iter()
        .find(|r| !is_various_artists(r))
        .or_else(|| releases.first())
}

fn is_various_artists(release: &dto::Release) -> bool {
    release.artist_credit.iter().any(|credit| {
        credit
            .artist
            .as_ref()
            .is_some_and(|a| a.id == VARIOUS_ARTISTS_MBID)
            || credit
                .name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case("various artists"))
    })
}

/// Parse the year from a date string (YYYY, YYYY-MM, or YYYY-MM-DD)
fn parse_year(date: &str) -> Option<i32> {
    date.split('-').next().and_then(|y| y.parse().ok())
}
