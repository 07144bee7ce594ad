//! Trait definition for provider adapters.
//!
//! One capability interface over the closed provider set: `search` plus the
//! static `priority` and `coverage` declarations the merger consumes.
//! Production code uses the real clients; tests substitute mock
//! implementations to exercise the orchestrator without network I/O.

use async_trait::async_trait;

use crate::resolver::domain::{Candidate, FieldCoverage, ProviderError, ProviderId, Query};

/// One catalog provider.
///
/// `search` issues network I/O and must be safe to retry idempotently. Zero
/// results is `Ok(vec![])`, never an error.
#[async_trait]
pub trait ProviderApi: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Merge priority (lower = preferred). Static per provider.
    fn priority(&self) -> u8 {
        self.id().priority()
    }

    /// Which record fields this provider can populate. Static per provider.
    fn coverage(&self) -> FieldCoverage {
        self.id().coverage()
    }

    async fn search(
        &self,
        query: &Query,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError>;
}

// Implement the trait for the real clients

#[async_trait]
impl ProviderApi for super::itunes::ItunesClient {
    fn id(&self) -> ProviderId {
        ProviderId::Itunes
    }

    async fn search(
        &self,
        query: &Query,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        self.search(query, max_results).await
    }
}

#[async_trait]
impl ProviderApi for super::deezer::DeezerClient {
    fn id(&self) -> ProviderId {
        ProviderId::Deezer
    }

    async fn search(
        &self,
        query: &Query,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        self.search(query, max_results).await
    }
}

#[async_trait]
impl ProviderApi for super::musicbrainz::MusicBrainzClient {
    fn id(&self) -> ProviderId {
        ProviderId::MusicBrainz
    }

    async fn search(
        &self,
        query: &Query,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        self.search(query, max_results).await
    }
}

#[async_trait]
impl ProviderApi for super::lrclib::LrclibClient {
    fn id(&self) -> ProviderId {
        ProviderId::Lrclib
    }

    async fn search(
        &self,
        query: &Query,
        max_results: usize,
    ) -> Result<Vec<Candidate>, ProviderError> {
        self.search(query, max_results).await
    }
}
