//! Audio download via yt-dlp
//!
//! This module shells out to the `yt-dlp` command-line tool to locate and
//! extract one audio stream for a resolved song. Shelling out is more
//! reliable than bindings and works on all platforms where yt-dlp is
//! installed. The core pipeline never depends on how the download happens,
//! only that it yields a file path to tag.
//!
//! Install yt-dlp:
//! - Windows: `winget install yt-dlp`
//! - macOS: `brew install yt-dlp`
//! - Linux: `pip install yt-dlp` or your package manager

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::resolver::MetadataRecord;

/// Common installation paths for yt-dlp
#[cfg(windows)]
const YTDLP_PATHS: &[&str] = &[
    "yt-dlp", // In PATH
    r"C:\Program Files\yt-dlp\yt-dlp.exe",
    r"C:\Program Files (x86)\yt-dlp\yt-dlp.exe",
];

#[cfg(not(windows))]
const YTDLP_PATHS: &[&str] = &[
    "yt-dlp", // In PATH
    "/usr/bin/yt-dlp",
    "/usr/local/bin/yt-dlp",
    "/opt/homebrew/bin/yt-dlp",
];

/// Errors that can occur while downloading
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("yt-dlp not found. Install it from https://github.com/yt-dlp/yt-dlp")]
    ToolMissing,

    #[error("yt-dlp failed: {0}")]
    ToolFailed(String),

    #[error("no audio stream found for '{0}'")]
    NoStream(String),
}

/// Find the yt-dlp executable, checking common installation paths
fn find_ytdlp() -> Option<&'static str> {
    YTDLP_PATHS
        .iter()
        .find(|&path| {
            Command::new(path)
                .arg("--version")
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false)
        })
        .map(|v| v as _)
}

/// Check if yt-dlp is available on the system
pub fn is_ytdlp_available() -> bool {
    find_ytdlp().is_some()
}

/// Get yt-dlp version string (for diagnostics)
pub fn get_ytdlp_version() -> Option<String> {
    let ytdlp = find_ytdlp()?;
    Command::new(ytdlp)
        .arg("--version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

/// The search term the downloader feeds to yt-dlp's `ytsearch1:`.
///
/// A resolved record gives "artist - title"; a failed resolution falls back
/// to the raw query text upstream of this call.
pub fn search_term(record: &MetadataRecord) -> String {
    if record.artist.value.is_empty() {
        record.title.value.clone()
    } else {
        format!("{} - {}", record.artist.value, record.title.value)
    }
}

/// Download the best audio stream for `term` into `dest_dir`.
///
/// Blocking; callers on the async runtime wrap this in `spawn_blocking`.
/// Returns the path of the extracted audio file.
pub fn download(term: &str, dest_dir: &Path, audio_format: &str) -> Result<PathBuf, DownloadError> {
    let ytdlp = find_ytdlp().ok_or(DownloadError::ToolMissing)?;

    tracing::info!(term, "downloading audio");

    let output = Command::new(ytdlp)
        .args(build_args(term, dest_dir, audio_format))
        .output()
        .map_err(|e| DownloadError::ToolFailed(format!("failed to run yt-dlp: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DownloadError::ToolFailed(stderr.trim().to_string()));
    }

    // --print after_move:filepath emits the final path of the extracted file
    let stdout = String::from_utf8_lossy(&output.stdout);
    let path = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| DownloadError::NoStream(term.to_string()))?;

    if !path.exists() {
        return Err(DownloadError::NoStream(term.to_string()));
    }

    tracing::debug!(path = %path.display(), "download finished");
    Ok(path)
}

/// Arguments for one extraction run.
fn build_args(term: &str, dest_dir: &Path, audio_format: &str) -> Vec<String> {
    vec![
        format!("ytsearch1:{term}"),
        "--no-playlist".to_string(),
        "-x".to_string(),
        "--audio-format".to_string(),
        audio_format.to_string(),
        "--audio-quality".to_string(),
        "0".to_string(),
        "-o".to_string(),
        dest_dir.join("%(title)s.%(ext)s").display().to_string(),
        "--no-simulate".to_string(),
        "--print".to_string(),
        "after_move:filepath".to_string(),
        "--quiet".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{Field, ProviderId};

    fn record(title: &str, artist: &str) -> MetadataRecord {
        MetadataRecord {
            title: Field::from_provider(title.to_string(), ProviderId::Itunes),
            artist: Field::from_provider(artist.to_string(), ProviderId::Itunes),
            album: None,
            release_year: None,
            genre: None,
            isrc: None,
            cover_art: None,
            lyrics: None,
            confidence: 1.0,
        }
    }

    #[test]
    fn test_search_term_with_artist() {
        let r = record("Shake It Off", "Taylor Swift");
        assert_eq!(search_term(&r), "Taylor Swift - Shake It Off");
    }

    #[test]
    fn test_search_term_without_artist() {
        let r = record("Shake It Off", "");
        assert_eq!(search_term(&r), "Shake It Off");
    }

    #[test]
    fn test_build_args_shape() {
        let args = build_args("Artist - Song", Path::new("/tmp/music"), "mp3");

        assert_eq!(args[0], "ytsearch1:Artist - Song");
        assert!(args.contains(&"--audio-format".to_string()));
        assert!(args.contains(&"mp3".to_string()));
        assert!(args.iter().any(|a| a.contains("%(title)s")));
    }

    #[test]
    fn test_is_ytdlp_available_does_not_panic() {
        let _ = is_ytdlp_available();
    }
}
