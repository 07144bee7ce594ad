//! Adapter layer: Convert iTunes DTOs to domain models
//!
//! This is the ONLY place where iTunes DTO types are converted to domain
//! types. If Apple changes their response format, only this file and dto.rs
//! need to change.

use super::dto;
use crate::resolver::domain::{Candidate, CoverArtRef, ProviderId};

/// Size we rewrite artwork thumbnail URLs to. The store serves arbitrary
/// sizes by path segment, so the 100x100 thumbnail URL can be upgraded.
const ARTWORK_SIZE: u32 = 1200;

/// Convert a search response into candidates, dropping results that aren't
/// songs (no track name).
pub fn to_candidates(response: dto::SearchResponse) -> Vec<Candidate> {
    response
        .results
        .into_iter()
        .filter(|r| r.track_name.is_some())
        .map(to_candidate)
        .collect()
}

fn to_candidate(track: dto::TrackResult) -> Candidate {
    let cover_art = artwork_ref(&track);
    Candidate {
        provider_id: Some(ProviderId::Itunes),
        source_id: track.track_id.map(|id| id.to_string()).unwrap_or_default(),
        title: track.track_name.unwrap_or_default(),
        artist: track.artist_name.unwrap_or_default(),
        album: track.collection_name.filter(|s| !s.is_empty()),
        release_year: track.release_date.as_deref().and_then(parse_year),
        genre: track.primary_genre_name.filter(|s| !s.is_empty()),
        isrc: None,
        cover_art,
        lyrics: None,
    }
}

/// Parse the year from a date string (YYYY, YYYY-MM, or full ISO timestamp)
fn parse_year(date: &str) -> Option<i32> {
    date.split('-').next().and_then(|y| y.parse().ok())
}

/// Build a cover art reference from the thumbnail URLs.
///
/// Prefers the 100x100 URL with its size segment rewritten to a large
/// rendition; falls back to the thumbnail as-is when the URL doesn't carry
/// the expected `{size}x{size}` segment.
fn artwork_ref(track: &dto::TrackResult) -> Option<CoverArtRef> {
    let (url, size) = track
        .artwork_url100
        .as_deref()
        .map(|u| (u, 100))
        .or_else(|| track.artwork_url60.as_deref().map(|u| (u, 60)))?;

    match rewrite_size(url, size, ARTWORK_SIZE) {
        Some(rewritten) => Some(CoverArtRef {
            url: rewritten,
            size: ARTWORK_SIZE,
        }),
        None => Some(CoverArtRef {
            url: url.to_string(),
            size,
        }),
    }
}

/// Replace the `{from}x{from}` segment in the last path component of `url`
/// with `{to}x{to}`.
fn rewrite_size(url: &str, from: u32, to: u32) -> Option<String> {
    let (prefix, basename) = url.rsplit_once('/')?;
    let needle = format!("{from}x{from}");
    if !basename.contains(&needle) {
        return None;
    }
    let replacement = format!("{to}x{to}");
    Some(format!("{prefix}/{}", basename.replace(&needle, &replacement)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str, artist: &str) -> dto::TrackResult {
        dto::TrackResult {
            track_id: Some(907242710),
            track_name: Some(name.to_string()),
            artist_name: Some(artist.to_string()),
            collection_name: Some("1989".to_string()),
            track_time_millis: Some(219209),
            release_date: Some("2014-08-18T07:00:00Z".to_string()),
            primary_genre_name: Some("Pop".to_string()),
            track_number: Some(6),
            track_count: Some(13),
            artwork_url100: Some(
                "https://example.mzstatic.com/image/thumb/source/100x100bb.jpg".to_string(),
            ),
            artwork_url60: None,
        }
    }

    #[test]
    fn test_convert_song() {
        let response = dto::SearchResponse {
            result_count: 1,
            results: vec![track("Shake It Off", "Taylor Swift")],
        };

        let candidates = to_candidates(response);

        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.provider_id, Some(ProviderId::Itunes));
        assert_eq!(c.source_id, "907242710");
        assert_eq!(c.title, "Shake It Off");
        assert_eq!(c.artist, "Taylor Swift");
        assert_eq!(c.album.as_deref(), Some("1989"));
        assert_eq!(c.release_year, Some(2014));
        assert_eq!(c.genre.as_deref(), Some("Pop"));
    }

    #[test]
    fn test_artwork_url_is_upsized() {
        let c = &to_candidates(dto::SearchResponse {
            result_count: 1,
            results: vec![track("Song", "Artist")],
        })[0];

        let cover = c.cover_art.as_ref().expect("cover art");
        assert_eq!(
            cover.url,
            "https://example.mzstatic.com/image/thumb/source/1200x1200bb.jpg"
        );
        assert_eq!(cover.size, 1200);
    }

    #[test]
    fn test_unexpected_artwork_url_kept_as_is() {
        let mut t = track("Song", "Artist");
        t.artwork_url100 = Some("https://example.com/cover.jpg".to_string());

        let c = &to_candidates(dto::SearchResponse {
            result_count: 1,
            results: vec![t],
        })[0];

        let cover = c.cover_art.as_ref().expect("cover art");
        assert_eq!(cover.url, "https://example.com/cover.jpg");
        assert_eq!(cover.size, 100);
    }

    #[test]
    fn test_non_song_results_are_dropped() {
        let mut t = track("Song", "Artist");
        t.track_name = None;

        let candidates = to_candidates(dto::SearchResponse {
            result_count: 1,
            results: vec![t],
        });

        assert!(candidates.is_empty());
    }

    #[test]
    fn test_parse_year_variants() {
        assert_eq!(parse_year("2014-08-18T07:00:00Z"), Some(2014));
        assert_eq!(parse_year("1975"), Some(1975));
        assert_eq!(parse_year("not-a-date"), None);
    }
}
