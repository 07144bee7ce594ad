//! Query-to-candidate similarity scoring.
//!
//! Pure computation over already-normalized text: no I/O, no state, no
//! randomness. Same inputs always produce the same score, and scoring never
//! fails - 0.0 is a valid score, not an error.

use crate::resolver::domain::{Candidate, Query};
use crate::resolver::normalize::{self, NormalizedText};

/// Weight of title similarity in the composite score.
const TITLE_WEIGHT: f32 = 0.6;
/// Weight of artist similarity in the composite score.
const ARTIST_WEIGHT: f32 = 0.4;
/// Two artist tokens this similar count as the same token for overlap.
const TOKEN_MATCH_MIN: f64 = 0.8;

/// Version markers a candidate can advertise in its parenthetical/suffix
/// text. "Song (Live)" is a different recording than "Song", even though
/// their normalized titles compare equal.
const VERSION_MARKERS: &[&str] = &[
    "live",
    "remix",
    "acoustic",
    "karaoke",
    "instrumental",
    "demo",
    "cover",
    "nightcore",
];
/// Cost per version marker the candidate advertises but the query didn't
/// ask for.
const VERSION_MISMATCH_PENALTY: f32 = 0.15;

/// Score a candidate against a query, in [0, 1].
///
/// Title and artist are compared independently with a token-sort ratio and
/// combined as a weighted sum. A query without an artist is scored on title
/// alone. An empty candidate title scores 0.0.
pub fn score(query: &Query, candidate: &Candidate) -> f32 {
    let cand_title = normalize::normalize(&candidate.title);
    if cand_title.is_empty() {
        return 0.0;
    }

    let title_sim = token_sort_ratio(&query.norm_title.text, &cand_title.text);

    let base = match &query.norm_artist {
        Some(q_artist) if !q_artist.is_empty() => {
            let cand_artist = normalize::normalize(&candidate.artist);
            let artist_sim = artist_similarity(q_artist, &cand_artist);
            TITLE_WEIGHT * title_sim + ARTIST_WEIGHT * artist_sim
        }
        _ => title_sim,
    };

    (base - version_penalty(query, &cand_title)).max(0.0)
}

/// Penalty for version markers ("live", "remix", ...) in the candidate's
/// parenthetical/suffix text that the query never asked for.
fn version_penalty(query: &Query, cand_title: &NormalizedText) -> f32 {
    let wanted = |marker: &str| {
        query.norm_title.tokens().any(|t| t == marker)
            || query
                .norm_title
                .extra
                .split_whitespace()
                .any(|t| t == marker)
    };

    let mismatches = VERSION_MARKERS
        .iter()
        .filter(|marker| {
            cand_title.extra.split_whitespace().any(|t| t == **marker) && !wanted(marker)
        })
        .count();

    mismatches as f32 * VERSION_MISMATCH_PENALTY
}

/// Normalized Levenshtein over alphabetically sorted tokens, so word order
/// ("Bowie, David" vs "David Bowie") costs nothing.
fn token_sort_ratio(a: &str, b: &str) -> f32 {
    strsim::normalized_levenshtein(&sort_tokens(a), &sort_tokens(b)) as f32
}

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Artist similarity between a query credit and a candidate credit.
///
/// Two comparisons run side by side and the better one wins: the whole
/// credits as token-sorted strings (handles "Bowie, David" vs "David
/// Bowie"), and per-segment best matching where each query artist takes its
/// best similarity against any candidate segment. The segmented path is
/// damped by the symmetric token overlap of the two credits, so a candidate
/// listing extra unrelated artists cannot ride a single perfect segment to a
/// perfect sub-score.
fn artist_similarity(query: &NormalizedText, candidate: &NormalizedText) -> f32 {
    if candidate.is_empty() {
        return 0.0;
    }

    let whole = token_sort_ratio(&query.text, &candidate.text);

    let per_segment_sum: f32 = query
        .artists
        .iter()
        .map(|qa| {
            candidate
                .artists
                .iter()
                .map(|ca| token_sort_ratio(qa, ca))
                .fold(0.0, f32::max)
        })
        .sum();
    let coverage = per_segment_sum / query.artists.len().max(1) as f32;
    let segmented = coverage * token_overlap(query, candidate);

    whole.max(segmented)
}

/// Symmetric soft Jaccard over artist tokens: the fraction of tokens on
/// either side that have a near-equal counterpart on the other side.
fn token_overlap(a: &NormalizedText, b: &NormalizedText) -> f32 {
    let a_tokens: Vec<&str> = a.tokens().collect();
    let b_tokens: Vec<&str> = b.tokens().collect();
    if a_tokens.is_empty() && b_tokens.is_empty() {
        return 1.0;
    }

    let matches = |from: &[&str], to: &[&str]| {
        from.iter()
            .filter(|t| {
                to.iter()
                    .any(|o| strsim::normalized_levenshtein(t, o) >= TOKEN_MATCH_MIN)
            })
            .count()
    };

    let matched = matches(&a_tokens, &b_tokens) + matches(&b_tokens, &a_tokens);
    matched as f32 / (a_tokens.len() + b_tokens.len()) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, artist: &str) -> Candidate {
        Candidate {
            title: title.into(),
            artist: artist.into(),
            ..Default::default()
        }
    }

    #[test]
    fn exact_match_scores_one() {
        let q = Query::new("Shake It Off", Some("Taylor Swift".into()));
        let c = candidate("Shake It Off", "Taylor Swift");
        assert!((score(&q, &c) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn exact_match_ignores_case_and_diacritics() {
        let q = Query::new("Deja Vu", Some("Beyonce".into()));
        let c = candidate("Déjà Vu", "Beyoncé");
        assert!((score(&q, &c) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_candidate_title_scores_zero() {
        let q = Query::new("Anything", None);
        let c = candidate("", "Someone");
        assert_eq!(score(&q, &c), 0.0);
    }

    #[test]
    fn title_only_query_uses_full_weight() {
        let q = Query::new("Shake It Off", None);
        let c = candidate("Shake It Off", "Whoever");
        assert!((score(&q, &c) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn small_typo_stays_above_default_threshold() {
        let q = Query::new("Shake It 0ff", Some("Taylor Swift".into()));
        let c = candidate("Shake It Off", "Taylor Swift");
        let s = score(&q, &c);
        assert!(s >= 0.55, "typo score {s} should pass the default threshold");
        assert!(s < 1.0);
    }

    #[test]
    fn unrelated_candidate_scores_low() {
        let q = Query::new("Shake It Off", Some("Taylor Swift".into()));
        let c = candidate("Smells Like Teen Spirit", "Nirvana");
        assert!(score(&q, &c) < 0.4);
    }

    #[test]
    fn word_order_does_not_matter() {
        let q = Query::new("Under Pressure", Some("Bowie, David".into()));
        let c = candidate("Under Pressure", "David Bowie");
        assert!((score(&q, &c) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn multi_artist_query_matches_joint_credit() {
        let q = Query::new("Under Pressure", Some("Queen & David Bowie".into()));
        let c = candidate("Under Pressure", "Queen & David Bowie");
        assert!((score(&q, &c) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn spurious_extra_artists_are_penalized() {
        let q = Query::new("Under Pressure", Some("Queen".into()));
        let exact = candidate("Under Pressure", "Queen");
        let padded = candidate("Under Pressure", "Queen & David Bowie & Somebody Else");
        assert!(score(&q, &padded) < score(&q, &exact));
    }

    #[test]
    fn unrequested_version_marker_is_penalized() {
        let q = Query::new("Shake It Off", Some("Taylor Swift".into()));
        let studio = candidate("Shake It Off", "Taylor Swift");
        let live = candidate("Shake It Off (Live)", "Taylor Swift");
        assert!((score(&q, &studio) - 1.0).abs() < 1e-6);
        assert!(score(&q, &live) < score(&q, &studio));
    }

    #[test]
    fn requested_version_marker_is_not_penalized() {
        let q = Query::new("Shake It Off (Live)", Some("Taylor Swift".into()));
        let live = candidate("Shake It Off (Live)", "Taylor Swift");
        assert!((score(&q, &live) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn scoring_is_deterministic() {
        let q = Query::new("Shake It Off", Some("Taylor Swift".into()));
        let c = candidate("Shake It Of", "Taylor Swift");
        assert_eq!(score(&q, &c), score(&q, &c));
    }
}
