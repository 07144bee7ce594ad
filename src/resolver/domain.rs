//! Internal domain models for the metadata resolution pipeline.
//!
//! These types are OUR types - they don't change when a provider's API
//! changes. Every provider response gets converted into a [`Candidate`] by
//! that provider's adapter, and nothing outside an adapter ever sees a wire
//! format.

use std::time::Duration;

use crate::resolver::normalize::{self, NormalizedText};

/// The fixed, closed set of catalog providers.
///
/// Variant order is priority order: lower discriminant = preferred source
/// during merging. Adding a provider means adding a variant here plus an
/// adapter module; there is no runtime registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProviderId {
    Itunes,
    Deezer,
    MusicBrainz,
    Lrclib,
}

impl ProviderId {
    /// All providers, in priority order.
    pub const ALL: [ProviderId; 4] = [
        ProviderId::Itunes,
        ProviderId::Deezer,
        ProviderId::MusicBrainz,
        ProviderId::Lrclib,
    ];

    /// Merge priority (lower = preferred).
    pub fn priority(self) -> u8 {
        match self {
            ProviderId::Itunes => 0,
            ProviderId::Deezer => 1,
            ProviderId::MusicBrainz => 2,
            ProviderId::Lrclib => 3,
        }
    }

    /// Which record fields this provider is able to supply.
    pub fn coverage(self) -> FieldCoverage {
        match self {
            ProviderId::Itunes => {
                FieldCoverage::TITLE
                    | FieldCoverage::ARTIST
                    | FieldCoverage::ALBUM
                    | FieldCoverage::YEAR
                    | FieldCoverage::GENRE
                    | FieldCoverage::COVER_ART
            }
            ProviderId::Deezer => {
                FieldCoverage::TITLE
                    | FieldCoverage::ARTIST
                    | FieldCoverage::ALBUM
                    | FieldCoverage::COVER_ART
            }
            ProviderId::MusicBrainz => {
                FieldCoverage::TITLE
                    | FieldCoverage::ARTIST
                    | FieldCoverage::ALBUM
                    | FieldCoverage::YEAR
                    | FieldCoverage::ISRC
                    | FieldCoverage::COVER_ART
            }
            ProviderId::Lrclib => FieldCoverage::LYRICS,
        }
    }

    /// Human-readable provider name for logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            ProviderId::Itunes => "iTunes",
            ProviderId::Deezer => "Deezer",
            ProviderId::MusicBrainz => "MusicBrainz",
            ProviderId::Lrclib => "LRCLIB",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// The set of [`MetadataRecord`] fields a provider can populate.
    ///
    /// The merger only takes a field from a provider that declares coverage
    /// of it, so a lyrics catalog can never win the album field with
    /// whatever it happens to echo back.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldCoverage: u8 {
        const TITLE = 1 << 0;
        const ARTIST = 1 << 1;
        const ALBUM = 1 << 2;
        const YEAR = 1 << 3;
        const GENRE = 1 << 4;
        const ISRC = 1 << 5;
        const COVER_ART = 1 << 6;
        const LYRICS = 1 << 7;
    }
}

/// A parsed user query. Immutable once constructed.
///
/// The original text is retained for display and logging; the normalized
/// forms are what every comparison uses.
#[derive(Debug, Clone)]
pub struct Query {
    /// Song title as typed by the user.
    pub title: String,
    /// Artist as typed by the user, if given.
    pub artist: Option<String>,
    /// Storefront/country hint (`market:FR` prefix), forwarded to providers
    /// that accept one.
    pub market: Option<String>,
    pub norm_title: NormalizedText,
    pub norm_artist: Option<NormalizedText>,
}

impl Query {
    pub fn new(title: impl Into<String>, artist: Option<String>) -> Self {
        let title = title.into();
        let norm_title = normalize::normalize(&title);
        let norm_artist = artist.as_deref().map(normalize::normalize);
        Self {
            title,
            artist,
            market: None,
            norm_title,
            norm_artist,
        }
    }

    pub fn with_market(mut self, market: Option<String>) -> Self {
        self.market = market;
        self
    }

    /// Parse a raw CLI query string.
    ///
    /// Supports the `title -- artist` separator and an optional `market:XX`
    /// token anywhere in the string.
    pub fn parse(raw: &str) -> Self {
        let mut text = raw.trim().to_string();

        let mut market = None;
        if let Some(start) = text.find("market:") {
            let rest = &text[start + "market:".len()..];
            let end = rest
                .find(char::is_whitespace)
                .unwrap_or(rest.len());
            if end > 0 {
                market = Some(rest[..end].to_string());
                text.replace_range(start..start + "market:".len() + end, "");
            }
        }

        let (title, artist) = match text.split_once("--") {
            Some((t, a)) => (t.trim().to_string(), Some(a.trim().to_string())),
            None => (text.trim().to_string(), None),
        };
        let artist = artist.filter(|a| !a.is_empty());

        Self::new(title, artist).with_market(market)
    }

    /// Search term sent to provider APIs: `title artist` when an artist is
    /// present, otherwise the title alone.
    pub fn search_term(&self) -> String {
        match &self.artist {
            Some(artist) => format!("{} {}", self.title, artist),
            None => self.title.clone(),
        }
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", self.title)?;
        if let Some(ref artist) = self.artist {
            write!(f, " - '{}'", artist)?;
        }
        if let Some(ref market) = self.market {
            write!(f, " on '{}' market", market)?;
        }
        Ok(())
    }
}

/// Opaque reference to cover art hosted by a provider.
///
/// The core never carries image bytes; the fetch collaborator resolves this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArtRef {
    pub url: String,
    /// Smallest dimension in pixels, 0 when unknown.
    pub size: u32,
}

/// Opaque reference to lyrics hosted by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsRef {
    pub provider: ProviderId,
    /// Provider-specific locator (URL or id) the fetch collaborator resolves.
    pub locator: String,
}

/// One search result from one provider, pre-scoring.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub provider_id: Option<ProviderId>,
    /// Provider-specific opaque id (track id, recording MBID, ...).
    pub source_id: String,
    pub title: String,
    /// Display artist string; multiple credits joined the way the provider
    /// joins them ("A & B", "A feat. B").
    pub artist: String,
    pub album: Option<String>,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
    pub isrc: Option<String>,
    pub cover_art: Option<CoverArtRef>,
    pub lyrics: Option<LyricsRef>,
}

impl Candidate {
    /// A candidate is matchable only when both identifying fields are
    /// non-empty; anything else never reaches the scorer's weighted path.
    pub fn is_matchable(&self) -> bool {
        !self.title.is_empty() && !self.artist.is_empty()
    }
}

/// A candidate plus its similarity to the query that produced it.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    /// Similarity in [0, 1]; 1.0 means normalized title (and artist, when
    /// queried) match exactly.
    pub score: f32,
}

/// Outcome of one provider for one query. Exactly one per provider per
/// query, never partial.
#[derive(Debug, Clone)]
pub enum ProviderResult {
    Matched(ScoredCandidate),
    NoMatch,
    Failed(ProviderError),
}

impl ProviderResult {
    pub fn matched(&self) -> Option<&ScoredCandidate> {
        match self {
            ProviderResult::Matched(sc) => Some(sc),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProviderResult::Failed(_))
    }
}

/// Where a merged field's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Provider(ProviderId),
    /// Fallback to the user's own query text (title/artist only, and only
    /// when at least one provider matched).
    Query,
}

impl std::fmt::Display for FieldSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldSource::Provider(id) => f.write_str(id.name()),
            FieldSource::Query => f.write_str("query"),
        }
    }
}

/// A merged field value tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<T> {
    pub value: T,
    pub source: FieldSource,
}

impl<T> Field<T> {
    pub fn from_provider(value: T, provider: ProviderId) -> Self {
        Self {
            value,
            source: FieldSource::Provider(provider),
        }
    }

    pub fn from_query(value: T) -> Self {
        Self {
            value,
            source: FieldSource::Query,
        }
    }
}

/// The merged output of one resolution: one value per field, each tagged
/// with where it came from. Constructed once by the merger, immutable
/// afterwards, consumed by the tagging collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    pub title: Field<String>,
    pub artist: Field<String>,
    pub album: Option<Field<String>>,
    pub release_year: Option<Field<i32>>,
    pub genre: Option<Field<String>>,
    pub isrc: Option<Field<String>>,
    pub cover_art: Option<Field<CoverArtRef>>,
    pub lyrics: Option<Field<LyricsRef>>,
    /// Maximum score among all matched providers: the record is only as
    /// trustworthy as its best-matching source.
    pub confidence: f32,
}

/// Errors local to a single provider call. Always recoverable at the
/// orchestrator level (converted to [`ProviderResult::Failed`]).
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("rate limited - try again later")]
    RateLimited,

    #[error("failed to parse response: {0}")]
    Parse(String),
}

/// Raised by the merger when not a single provider matched; never silently
/// defaulted to a record built from the query alone.
#[derive(Debug, Clone, thiserror::Error)]
#[error("no provider supplied any field")]
pub struct NoSourceError;

/// Resolution-level failure surfaced to the caller of `resolve`. No
/// automatic retry inside the core.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// Every provider answered, but none produced an acceptable match.
    #[error("no acceptable match for {query}")]
    NoMatch { query: String },

    /// Every provider failed at the transport level.
    #[error("all providers failed for {query}")]
    AllProvidersFailed {
        query: String,
        failures: Vec<(ProviderId, ProviderError)>,
    },
}
