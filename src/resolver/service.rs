//! Resolution service - orchestrates the pipeline for one query:
//!
//! 1. Fan out to every provider concurrently (bounded by a per-provider
//!    timeout, so total latency tracks the slowest single provider)
//! 2. Score each provider's candidates and select a winner per provider
//! 3. Merge the winners into one record by static priority
//!
//! Provider failures are absorbed here: a timeout or HTTP error becomes a
//! [`ProviderResult::Failed`] slot and the remaining providers carry the
//! resolution. Only all-providers-failed or nobody-matched surface as
//! resolution errors. There are no retries; retry policy belongs to the
//! caller. Cancellation is cooperative: dropping the `resolve` future
//! abandons the in-flight requests and no partial record is ever observed.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::resolver::deezer::DeezerClient;
use crate::resolver::domain::{
    MetadataRecord, ProviderError, ProviderId, ProviderResult, Query, ResolutionError,
};
use crate::resolver::itunes::ItunesClient;
use crate::resolver::lrclib::LrclibClient;
use crate::resolver::musicbrainz::MusicBrainzClient;
use crate::resolver::select::MatchConfig;
use crate::resolver::traits::ProviderApi;
use crate::resolver::{merge, select};

/// Configuration for the resolution pipeline. Immutable and threaded
/// explicitly; there are no process-wide defaults to mutate.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    pub matching: MatchConfig,
    /// Independent deadline for each provider call.
    pub per_provider_timeout: Duration,
    /// How many candidates to request from each provider.
    pub max_results: usize,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            matching: MatchConfig::default(),
            per_provider_timeout: Duration::from_secs(10),
            max_results: 20,
        }
    }
}

/// Service resolving queries against the full provider set.
pub struct Resolver {
    providers: Vec<Box<dyn ProviderApi>>,
    config: ResolveConfig,
}

impl Resolver {
    /// Create a resolver over the standard provider set.
    pub fn new(config: ResolveConfig) -> Self {
        Self::with_providers(
            vec![
                Box::new(ItunesClient::new()),
                Box::new(DeezerClient::new()),
                Box::new(MusicBrainzClient::new()),
                Box::new(LrclibClient::new()),
            ],
            config,
        )
    }

    /// Create a resolver over an explicit provider set (used by tests).
    pub fn with_providers(providers: Vec<Box<dyn ProviderApi>>, config: ResolveConfig) -> Self {
        Self { providers, config }
    }

    /// Resolve a query into a merged metadata record.
    pub async fn resolve(&self, query: &Query) -> Result<MetadataRecord, ResolutionError> {
        tracing::info!(%query, "resolving");

        // Step 1: query every provider concurrently, each under its own
        // timeout. Every provider produces exactly one outcome.
        let searches = self.providers.iter().map(|provider| async move {
            let id = provider.id();
            let outcome = match tokio::time::timeout(
                self.config.per_provider_timeout,
                provider.search(query, self.config.max_results),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(self.config.per_provider_timeout)),
            };
            (id, outcome)
        });
        let outcomes = futures::future::join_all(searches).await;

        // Step 2: score and select per provider; failures become Failed
        // slots instead of aborting the resolution.
        let mut results: BTreeMap<ProviderId, ProviderResult> = BTreeMap::new();
        let mut failures: Vec<(ProviderId, ProviderError)> = Vec::new();
        for (id, outcome) in outcomes {
            let result = match outcome {
                Ok(candidates) => {
                    tracing::debug!(provider = %id, count = candidates.len(), "candidates received");
                    let selected = select::select(query, candidates, &self.config.matching);
                    if let Some(sc) = selected.matched() {
                        tracing::debug!(
                            provider = %id,
                            source_id = %sc.candidate.source_id,
                            score = sc.score,
                            "candidate selected"
                        );
                    }
                    selected
                }
                Err(err) => {
                    tracing::warn!(provider = %id, error = %err, "provider failed");
                    failures.push((id, err.clone()));
                    ProviderResult::Failed(err)
                }
            };
            results.insert(id, result);
        }

        if !results.is_empty() && results.values().all(ProviderResult::is_failed) {
            return Err(ResolutionError::AllProvidersFailed {
                query: query.to_string(),
                failures,
            });
        }

        // Step 3: merge the winners in static priority order.
        match merge::merge(query, &results) {
            Ok(record) => {
                tracing::info!(
                    title = %record.title.value,
                    artist = %record.artist.value,
                    confidence = record.confidence,
                    "resolved"
                );
                Ok(record)
            }
            Err(_) => Err(ResolutionError::NoMatch {
                query: query.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::domain::{FieldSource, LyricsRef};
    use crate::resolver::traits::mocks::{MockProvider, candidate};

    fn query() -> Query {
        Query::new("Shake It Off", Some("Taylor Swift".into()))
    }

    fn exact(provider: ProviderId) -> MockProvider {
        MockProvider::returning(
            provider,
            vec![candidate(provider, "Shake It Off", "Taylor Swift", "1989")],
        )
    }

    #[tokio::test]
    async fn all_providers_exact_resolves_with_full_confidence() {
        let resolver = Resolver::with_providers(
            vec![
                Box::new(exact(ProviderId::Itunes)),
                Box::new(exact(ProviderId::Deezer)),
                Box::new(exact(ProviderId::MusicBrainz)),
            ],
            ResolveConfig::default(),
        );

        let record = resolver.resolve(&query()).await.expect("resolved");
        assert_eq!(record.title.value, "Shake It Off");
        assert!((record.confidence - 1.0).abs() < 1e-6);
        assert_eq!(record.title.source, FieldSource::Provider(ProviderId::Itunes));
    }

    #[tokio::test]
    async fn typo_matches_at_default_threshold_but_not_strict() {
        let q = Query::new("Shake It 0ff", Some("Taylor Swift".into()));
        let providers = || -> Vec<Box<dyn ProviderApi>> { vec![Box::new(exact(ProviderId::Itunes))] };

        let lenient = Resolver::with_providers(providers(), ResolveConfig::default());
        assert!(lenient.resolve(&q).await.is_ok());

        let strict = Resolver::with_providers(
            providers(),
            ResolveConfig {
                matching: MatchConfig {
                    min_score: 0.99,
                    title_only_min_score: 0.99,
                },
                ..ResolveConfig::default()
            },
        );
        assert!(matches!(
            strict.resolve(&q).await,
            Err(ResolutionError::NoMatch { .. })
        ));
    }

    #[tokio::test]
    async fn timed_out_provider_does_not_block_resolution() {
        let resolver = Resolver::with_providers(
            vec![
                Box::new(MockProvider::stalled(ProviderId::Itunes)),
                Box::new(exact(ProviderId::Deezer)),
                Box::new(exact(ProviderId::MusicBrainz)),
            ],
            ResolveConfig {
                per_provider_timeout: Duration::from_millis(50),
                ..ResolveConfig::default()
            },
        );

        let record = resolver.resolve(&query()).await.expect("resolved");
        // fields come only from the responsive providers
        assert_eq!(record.title.source, FieldSource::Provider(ProviderId::Deezer));
        assert_eq!(
            record.album.expect("album").source,
            FieldSource::Provider(ProviderId::Deezer)
        );
    }

    #[tokio::test]
    async fn unrelated_candidates_everywhere_is_no_match() {
        let unrelated = |p| {
            MockProvider::returning(
                p,
                vec![candidate(p, "Smells Like Teen Spirit", "Nirvana", "Nevermind")],
            )
        };
        let resolver = Resolver::with_providers(
            vec![
                Box::new(unrelated(ProviderId::Itunes)),
                Box::new(unrelated(ProviderId::Deezer)),
            ],
            ResolveConfig::default(),
        );

        assert!(matches!(
            resolver.resolve(&query()).await,
            Err(ResolutionError::NoMatch { .. })
        ));
    }

    #[tokio::test]
    async fn all_transport_failures_is_all_providers_failed() {
        let resolver = Resolver::with_providers(
            vec![
                Box::new(MockProvider::failing(
                    ProviderId::Itunes,
                    ProviderError::RateLimited,
                )),
                Box::new(MockProvider::failing(
                    ProviderId::Deezer,
                    ProviderError::Http("500: Internal Server Error".into()),
                )),
            ],
            ResolveConfig::default(),
        );

        match resolver.resolve(&query()).await {
            Err(ResolutionError::AllProvidersFailed { failures, .. }) => {
                assert_eq!(failures.len(), 2);
            }
            other => panic!("expected AllProvidersFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn partial_failure_still_resolves() {
        let resolver = Resolver::with_providers(
            vec![
                Box::new(MockProvider::failing(
                    ProviderId::Itunes,
                    ProviderError::RateLimited,
                )),
                Box::new(MockProvider::no_results(ProviderId::Deezer)),
                Box::new(exact(ProviderId::MusicBrainz)),
            ],
            ResolveConfig::default(),
        );

        let record = resolver.resolve(&query()).await.expect("resolved");
        assert_eq!(
            record.title.source,
            FieldSource::Provider(ProviderId::MusicBrainz)
        );
    }

    #[tokio::test]
    async fn lyrics_provider_contributes_only_lyrics() {
        let mut lyrics_candidate = candidate(ProviderId::Lrclib, "Shake It Off", "Taylor Swift", "Wrong Album");
        lyrics_candidate.lyrics = Some(LyricsRef {
            provider: ProviderId::Lrclib,
            locator: "https://lrclib.net/api/get/42".into(),
        });
        let resolver = Resolver::with_providers(
            vec![
                Box::new(exact(ProviderId::Itunes)),
                Box::new(MockProvider::returning(ProviderId::Lrclib, vec![lyrics_candidate])),
            ],
            ResolveConfig::default(),
        );

        let record = resolver.resolve(&query()).await.expect("resolved");
        assert_eq!(
            record.lyrics.expect("lyrics").source,
            FieldSource::Provider(ProviderId::Lrclib)
        );
        assert_eq!(record.album.expect("album").value, "1989");
    }

    #[tokio::test]
    async fn merge_ignores_provider_completion_order() {
        // iTunes answers last (but within the timeout); it must still win
        // the shared fields because its static priority is highest.
        let mut slow_itunes = exact(ProviderId::Itunes);
        slow_itunes.delay = Some(Duration::from_millis(50));
        let resolver = Resolver::with_providers(
            vec![Box::new(slow_itunes), Box::new(exact(ProviderId::Deezer))],
            ResolveConfig::default(),
        );

        let record = resolver.resolve(&query()).await.expect("resolved");
        assert_eq!(record.title.source, FieldSource::Provider(ProviderId::Itunes));
    }
}
