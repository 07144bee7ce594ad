//! Merging per-provider winners into one metadata record.
//!
//! Field resolution walks providers in ascending priority order: the first
//! matched provider that declares coverage of a field and has a non-empty
//! value for it wins that field. The walk order comes from the static
//! [`ProviderId`] priority alone, never from the order provider responses
//! arrived in.

use std::collections::BTreeMap;

use crate::resolver::domain::{
    Candidate, Field, FieldCoverage, MetadataRecord, NoSourceError, ProviderId, ProviderResult,
    Query, ScoredCandidate,
};

/// Merge the per-provider results for one query into a single record.
///
/// Fails with [`NoSourceError`] when no provider matched at all: a record is
/// never fabricated from the query text alone, because that would assert
/// unverified user input as confirmed metadata. Providers that failed or
/// found no match simply contribute nothing.
pub fn merge(
    query: &Query,
    results: &BTreeMap<ProviderId, ProviderResult>,
) -> Result<MetadataRecord, NoSourceError> {
    // BTreeMap iteration follows ProviderId's ordering, which is priority
    // order - this is what makes the merge deterministic under concurrency.
    let matched: Vec<(ProviderId, &ScoredCandidate)> = results
        .iter()
        .filter_map(|(id, result)| result.matched().map(|sc| (*id, sc)))
        .collect();

    for (id, sc) in &matched {
        debug_assert!(
            sc.candidate.provider_id.is_none_or(|p| p == *id),
            "candidate filed under the wrong provider slot"
        );
    }

    if matched.is_empty() {
        return Err(NoSourceError);
    }

    let confidence = matched.iter().map(|(_, sc)| sc.score).fold(0.0, f32::max);

    let pick = |flag: FieldCoverage, extract: &dyn Fn(&Candidate) -> Option<String>| {
        matched
            .iter()
            .filter(|(id, _)| id.coverage().contains(flag))
            .find_map(|(id, sc)| {
                extract(&sc.candidate)
                    .filter(|v| !v.is_empty())
                    .map(|v| Field::from_provider(v, *id))
            })
    };

    let title = pick(FieldCoverage::TITLE, &|c| Some(c.title.clone()))
        .unwrap_or_else(|| Field::from_query(query.title.clone()));
    let artist = pick(FieldCoverage::ARTIST, &|c| Some(c.artist.clone()))
        .unwrap_or_else(|| Field::from_query(query.artist.clone().unwrap_or_default()));

    let album = pick(FieldCoverage::ALBUM, &|c| c.album.clone());
    let genre = pick(FieldCoverage::GENRE, &|c| c.genre.clone());
    let isrc = pick(FieldCoverage::ISRC, &|c| c.isrc.clone());

    let release_year = matched
        .iter()
        .filter(|(id, _)| id.coverage().contains(FieldCoverage::YEAR))
        .find_map(|(id, sc)| {
            sc.candidate
                .release_year
                .map(|y| Field::from_provider(y, *id))
        });

    let cover_art = matched
        .iter()
        .filter(|(id, _)| id.coverage().contains(FieldCoverage::COVER_ART))
        .find_map(|(id, sc)| {
            sc.candidate
                .cover_art
                .clone()
                .map(|r| Field::from_provider(r, *id))
        });

    let lyrics = matched
        .iter()
        .filter(|(id, _)| id.coverage().contains(FieldCoverage::LYRICS))
        .find_map(|(id, sc)| {
            sc.candidate
                .lyrics
                .clone()
                .map(|r| Field::from_provider(r, *id))
        });

    Ok(MetadataRecord {
        title,
        artist,
        album,
        release_year,
        genre,
        isrc,
        cover_art,
        lyrics,
        confidence,
    })
}
