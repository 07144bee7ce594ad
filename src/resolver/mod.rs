//! Metadata resolution pipeline - turns a free-text query into one merged
//! metadata record sourced from multiple catalog providers.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - Internal types that represent our
//!   business logic
//! - **Normalization** (`normalize.rs`) - Canonical comparison form for all
//!   free text
//! - **API DTOs** (`itunes/dto.rs`, `deezer/dto.rs`, ...) - Exact API
//!   response shapes
//! - **Adapters** - Convert DTOs to domain candidates
//! - **Clients** - HTTP clients for the provider APIs
//! - **Scorer / Selector / Merger** - Pure computations over fetched data
//! - **Service** - Orchestrates the concurrent fan-out and assembles the
//!   record
//!
//! This decoupling means:
//! 1. API changes don't ripple through our codebase
//! 2. We can test API contracts independently
//! 3. The orchestrator is testable entirely against mock providers
//!
//! # Usage
//!
//! ```ignore
//! use songgrab::resolver::{Query, ResolveConfig, Resolver};
//!
//! let resolver = Resolver::new(ResolveConfig::default());
//! let record = resolver.resolve(&Query::parse("Shake It Off -- Taylor Swift")).await?;
//! println!("{} - {}", record.artist.value, record.title.value);
//! ```

pub mod domain;
pub mod normalize;
pub mod score;
pub mod select;
pub mod merge;
pub mod traits;
pub mod service;

pub mod itunes;
pub mod deezer;
pub mod musicbrainz;
pub mod lrclib;

pub use domain::{
    Candidate, CoverArtRef, Field, FieldCoverage, FieldSource, LyricsRef, MetadataRecord,
    ProviderError, ProviderId, ProviderResult, Query, ResolutionError, ScoredCandidate,
};
pub use normalize::{NormalizedText, normalize};
pub use select::MatchConfig;
pub use service::{ResolveConfig, Resolver};
