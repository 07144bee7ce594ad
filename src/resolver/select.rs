//! Per-provider best-candidate selection.
//!
//! Scores every candidate a provider returned and keeps the best one, or
//! reports [`ProviderResult::NoMatch`] when nothing clears the acceptance
//! threshold. Ties go to the earlier candidate: providers return their own
//! relevance-ranked order, which is a meaningful tiebreak.

use crate::resolver::domain::{Candidate, ProviderResult, Query, ScoredCandidate};
use crate::resolver::score;

/// Acceptance thresholds for the selector. Callers may tighten these to
/// demand stricter matches.
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    /// Minimum composite score when the query carries an artist.
    pub min_score: f32,
    /// Minimum score for title-only queries; higher because a lone title is
    /// weaker evidence.
    pub title_only_min_score: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_score: 0.55,
            title_only_min_score: 0.65,
        }
    }
}

impl MatchConfig {
    fn threshold_for(&self, query: &Query) -> f32 {
        if query.artist.is_some() {
            self.min_score
        } else {
            self.title_only_min_score
        }
    }
}

/// Pick the best-scoring matchable candidate, or `NoMatch`.
pub fn select(query: &Query, mut candidates: Vec<Candidate>, config: &MatchConfig) -> ProviderResult {
    candidates.retain(Candidate::is_matchable);

    let mut best: Option<(usize, f32)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let s = score::score(query, candidate);
        // strict > keeps the earlier candidate on equal scores
        if best.is_none_or(|(_, best_score)| s > best_score) {
            best = Some((idx, s));
        }
    }

    match best {
        Some((idx, s)) if s >= config.threshold_for(query) => {
            ProviderResult::Matched(ScoredCandidate {
                candidate: candidates.swap_remove(idx),
                score: s,
            })
        }
        _ => ProviderResult::NoMatch,
    }
}
