//! Resolution and download commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use tokio::runtime::Runtime;

use crate::config::DownloadsConfig;
use crate::download::{self, DownloadError};
use crate::error::Error;
use crate::resolver::{FieldSource, MetadataRecord, Query, ResolutionError, Resolver};
use crate::tags;

/// Resolve, download, and tag a batch of queries.
///
/// Queries are processed independently: one failure never aborts the rest.
/// The command fails (non-zero exit) if any query failed to resolve.
pub fn cmd_fetch(
    rt: &Runtime,
    queries: &[String],
    output: Option<&Path>,
    min_score: Option<f32>,
    timeout_ms: Option<u64>,
    max_workers: usize,
) -> anyhow::Result<()> {
    let queries = super::expand_query_args(queries)?;
    let config = super::effective_config(min_score, timeout_ms);

    let dest = match output {
        Some(dir) => dir.to_path_buf(),
        None => match config.downloads.directory {
            Some(ref dir) => dir.clone(),
            None => std::env::current_dir()?,
        },
    };
    std::fs::create_dir_all(&dest)?;

    if !download::is_ytdlp_available() {
        super::tools::print_ytdlp_install_instructions();
        anyhow::bail!("yt-dlp is required for fetching");
    }

    let resolver = Arc::new(Resolver::new(config.resolve_config()));
    let downloads = Arc::new(config.downloads.clone());

    println!("Fetching {} song(s)...\n", queries.len());

    let outcomes = rt.block_on(async {
        futures::stream::iter(queries.into_iter().map(|raw| {
            let resolver = Arc::clone(&resolver);
            let downloads = Arc::clone(&downloads);
            let dest = dest.clone();
            async move {
                let outcome = process_query(&resolver, &raw, &dest, &downloads).await;
                (raw, outcome)
            }
        }))
        .buffer_unordered(max_workers.max(1))
        .collect::<Vec<_>>()
        .await
    });

    let mut failed = 0usize;
    let mut unresolved = 0usize;
    for (raw, outcome) in &outcomes {
        match outcome {
            Ok(path) => println!("✓ {} → {}", raw, path.display()),
            Err(e) => {
                println!("✗ {}: {}", raw, e);
                failed += 1;
                if e.is_resolution_failure() {
                    unresolved += 1;
                }
            }
        }
    }

    println!(
        "\nDone! {} fetched, {} failed ({} unresolved)",
        outcomes.len() - failed,
        failed,
        unresolved
    );

    if failed > 0 {
        anyhow::bail!("{failed} of {} queries failed", outcomes.len());
    }
    Ok(())
}

/// One query end to end: resolve → download → fetch art/lyrics → tag →
/// rename.
async fn process_query(
    resolver: &Resolver,
    raw: &str,
    dest: &Path,
    downloads: &DownloadsConfig,
) -> crate::error::Result<PathBuf> {
    let query = Query::parse(raw);

    let record = match resolver.resolve(&query).await {
        Ok(record) => record,
        Err(err) => {
            // Resolution failed; still fetch the audio from the raw query so
            // the user gets a (untagged) file, but report the query failed.
            tracing::warn!(%query, error = %err, "resolution failed, downloading untagged");
            if let Ok(path) = run_download(&query.search_term(), dest, downloads).await {
                tracing::info!(path = %path.display(), "untagged audio saved");
            }
            return Err(Error::Resolution(err));
        }
    };

    let path = run_download(&download::search_term(&record), dest, downloads).await?;

    // Fetch collaborator payloads; failures here only degrade the tags.
    let art = match record.cover_art {
        Some(ref field) => tags::fetch_cover(&field.value).await,
        None => None,
    };
    let lyrics = match record.lyrics {
        Some(ref field) => tags::fetch_lyrics(&field.value).await,
        None => None,
    };

    match tags::write(&path, &record, art.as_ref(), lyrics.as_deref()) {
        Ok(result) => tracing::info!(fields = result.fields_written, "tags written"),
        Err(e) => tracing::warn!(error = %e, "tagging failed, keeping untagged file"),
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(&downloads.audio_format)
        .to_string();
    let final_path = path.with_file_name(tags::final_filename(&record, &extension));
    std::fs::rename(&path, &final_path)?;

    if downloads.write_lrc_sidecar {
        if let Some(ref text) = lyrics {
            // only synced (LRC-timestamped) lyrics are useful as a sidecar
            if text.trim_start().starts_with('[') {
                let lrc_path = final_path.with_extension("lrc");
                if let Err(e) = std::fs::write(&lrc_path, format!("{text}\n")) {
                    tracing::warn!(error = %e, "failed to write lyrics sidecar");
                }
            }
        }
    }

    Ok(final_path)
}

/// Run the blocking downloader off the async runtime.
async fn run_download(
    term: &str,
    dest: &Path,
    downloads: &DownloadsConfig,
) -> crate::error::Result<PathBuf> {
    let term = term.to_string();
    let dest = dest.to_path_buf();
    let format = downloads.audio_format.clone();
    let path = tokio::task::spawn_blocking(move || download::download(&term, &dest, &format))
        .await
        .map_err(|e| Error::Download(DownloadError::ToolFailed(e.to_string())))??;
    Ok(path)
}

/// Resolve queries and print the merged records without downloading.
pub fn cmd_resolve(
    rt: &Runtime,
    queries: &[String],
    min_score: Option<f32>,
    timeout_ms: Option<u64>,
) -> anyhow::Result<()> {
    let queries = super::expand_query_args(queries)?;
    let config = super::effective_config(min_score, timeout_ms);
    let resolver = Resolver::new(config.resolve_config());

    let mut failed = 0;
    rt.block_on(async {
        for raw in &queries {
            let query = Query::parse(raw);
            match resolver.resolve(&query).await {
                Ok(record) => print_record(&query, &record),
                Err(ResolutionError::NoMatch { query }) => {
                    println!("✗ No acceptable match for {query}\n");
                    failed += 1;
                }
                Err(ResolutionError::AllProvidersFailed { query, failures }) => {
                    println!("✗ All providers failed for {query}:");
                    for (provider, error) in failures {
                        println!("    {provider}: {error}");
                    }
                    println!();
                    failed += 1;
                }
            }
        }
    });

    if failed > 0 {
        anyhow::bail!("{failed} of {} queries failed to resolve", queries.len());
    }
    Ok(())
}

fn print_record(query: &Query, record: &MetadataRecord) {
    println!(
        "✓ {} (confidence: {:.0}%)",
        query,
        record.confidence * 100.0
    );
    let source = |s: &FieldSource| format!("[{s}]");
    println!("  Title:  {} {}", record.title.value, source(&record.title.source));
    println!("  Artist: {} {}", record.artist.value, source(&record.artist.source));
    if let Some(ref album) = record.album {
        println!("  Album:  {} {}", album.value, source(&album.source));
    }
    if let Some(ref year) = record.release_year {
        println!("  Year:   {} {}", year.value, source(&year.source));
    }
    if let Some(ref genre) = record.genre {
        println!("  Genre:  {} {}", genre.value, source(&genre.source));
    }
    if let Some(ref isrc) = record.isrc {
        println!("  ISRC:   {} {}", isrc.value, source(&isrc.source));
    }
    if let Some(ref cover) = record.cover_art {
        println!("  Cover:  {} {}", cover.value.url, source(&cover.source));
    }
    if let Some(ref lyrics) = record.lyrics {
        println!("  Lyrics: {} {}", lyrics.value.locator, source(&lyrics.source));
    }
    println!();
}
