//! Text normalization for comparison.
//!
//! Free text from users and providers disagrees on case, diacritics,
//! punctuation, featuring markers, and parenthetical version info. Everything
//! that compares strings goes through [`normalize`] first so those
//! differences never reach the scorer.
//!
//! Normalization is deterministic and idempotent on the canonical text:
//! `normalize(n.text).text == n.text` for any input.

use unaccent::unaccent;

/// A string reduced to a comparison-safe canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText {
    /// Lower-cased, diacritic-folded, punctuation-free, whitespace-collapsed
    /// text with featuring markers removed.
    pub text: String,
    /// Artist segments split on multi-artist separators (`&`, `,`, `;`, `/`,
    /// feat/ft/featuring). A string without separators yields one segment
    /// equal to `text`. Empty input yields no segments.
    pub artists: Vec<String>,
    /// Parenthetical/bracketed content and trailing ` - ` suffixes
    /// (remix/live/version annotations), normalized separately so they can
    /// inform matching without polluting the main text.
    pub extra: String,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

/// Tokens that introduce a guest artist; dropped from the canonical text.
const FEAT_MARKERS: &[&str] = &["feat", "ft", "featuring"];

/// Characters that separate artists within one credit string.
const ARTIST_SEPARATORS: &[char] = &['&', ',', ';', '/'];

/// Canonicalize a string for comparison. Never fails; empty input produces
/// an empty [`NormalizedText`].
pub fn normalize(input: &str) -> NormalizedText {
    let folded = unaccent(input).to_lowercase();

    let (body, extra_raw) = split_enclosed(&folded);

    let mut segments: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for chunk in body.split(ARTIST_SEPARATORS) {
        for word in words(chunk) {
            if FEAT_MARKERS.contains(&word.as_str()) {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            } else {
                current.push(word);
            }
        }
        if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }

    let text = segments
        .iter()
        .map(|seg| seg.join(" "))
        .collect::<Vec<_>>()
        .join(" ");
    let artists = segments.into_iter().map(|seg| seg.join(" ")).collect();
    let extra = words(&extra_raw).collect::<Vec<_>>().join(" ");

    NormalizedText {
        text,
        artists,
        extra,
    }
}

/// Split `(...)`/`[...]` groups and a trailing ` - suffix` away from the
/// main text. Returns (body, enclosed).
fn split_enclosed(s: &str) -> (String, String) {
    let mut body = String::with_capacity(s.len());
    let mut extra = String::new();
    let mut depth = 0u32;

    for ch in s.chars() {
        match ch {
            '(' | '[' => {
                depth += 1;
                extra.push(' ');
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                extra.push(' ');
            }
            _ if depth > 0 => extra.push(ch),
            _ => body.push(ch),
        }
    }

    // "Title - Live at Wembley" style suffixes carry version info, not title
    if let Some(idx) = body.find(" - ") {
        extra.push(' ');
        extra.push_str(&body[idx + 3..]);
        body.truncate(idx);
    }

    (body, extra)
}

/// Alphanumeric words of a string; every other character acts as whitespace.
fn words(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
}
