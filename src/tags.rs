//! Embedding resolved metadata into audio files.
//!
//! Uses the lofty crate for format-independent tag access (ID3v2, Vorbis
//! comments, MP4 atoms). The resolver only carries opaque cover-art and
//! lyrics references; the fetch helpers here turn them into bytes/text
//! before embedding. Every failure on this side is a per-file warning, never
//! a pipeline failure.

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::resolver::{CoverArtRef, LyricsRef, MetadataRecord};

/// Tag writing errors
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("failed to open {path}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("failed to save tags to {path}: {message}")]
    Save { path: PathBuf, message: String },
}

/// Cover art bytes ready for embedding.
#[derive(Debug, Clone)]
pub struct EmbeddedArt {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Result of a write operation
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// Number of fields that were written
    pub fields_written: usize,
}

/// Write a resolved record into the file's native tag format.
///
/// `art` and `lyrics_text` are the already-fetched collaborator payloads;
/// pass `None` when fetching failed or was skipped.
pub fn write(
    path: &Path,
    record: &MetadataRecord,
    art: Option<&EmbeddedArt>,
    lyrics_text: Option<&str>,
) -> Result<WriteResult, TagError> {
    let mut tagged_file = Probe::open(path)
        .map_err(|e| TagError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .read()
        .map_err(|e| TagError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let tag_type = tagged_file.primary_tag_type();
    let tag = if let Some(tag) = tagged_file.tag_mut(tag_type) {
        tag
    } else {
        tagged_file.insert_tag(Tag::new(tag_type));
        tagged_file.tag_mut(tag_type).expect("Just inserted tag")
    };

    let mut fields_written = 0;

    if !record.title.value.is_empty() {
        tag.set_title(record.title.value.clone());
        fields_written += 1;
    }

    if !record.artist.value.is_empty() {
        tag.set_artist(record.artist.value.clone());
        fields_written += 1;
    }

    if let Some(ref album) = record.album {
        tag.set_album(album.value.clone());
        fields_written += 1;
    }

    if let Some(ref year) = record.release_year {
        if year.value > 0 {
            tag.set_year(year.value as u32);
            fields_written += 1;
        }
    }

    if let Some(ref genre) = record.genre {
        tag.set_genre(genre.value.clone());
        fields_written += 1;
    }

    if let Some(ref isrc) = record.isrc {
        tag.insert_text(ItemKey::Isrc, isrc.value.clone());
        fields_written += 1;
    }

    if let Some(text) = lyrics_text {
        tag.insert_text(ItemKey::Lyrics, text.to_string());
        fields_written += 1;
    }

    if let Some(art) = art {
        let picture = Picture::new_unchecked(
            PictureType::CoverFront,
            Some(mime_type_of(&art.mime_type)),
            None,
            art.data.clone(),
        );
        tag.remove_picture_type(PictureType::CoverFront);
        tag.push_picture(picture);
        fields_written += 1;
    }

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| TagError::Save {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(WriteResult { fields_written })
}

/// Final filename for a tagged download: `Artist - Title.ext`, sanitized for
/// the filesystem. Falls back to the bare title when the artist is unknown.
pub fn final_filename(record: &MetadataRecord, extension: &str) -> String {
    let stem = if record.artist.value.is_empty() {
        record.title.value.clone()
    } else {
        format!("{} - {}", record.artist.value, record.title.value)
    };
    format!("{}.{extension}", sanitize_filename::sanitize(stem))
}

// ============================================================================
// Fetch collaborators
//
// The pipeline hands over opaque references; these helpers resolve them to
// bytes/text. Both return None on any failure and log why.
// ============================================================================

/// Fetch cover art bytes for embedding.
pub async fn fetch_cover(reference: &CoverArtRef) -> Option<EmbeddedArt> {
    let response = match reqwest::get(&reference.url).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(url = %reference.url, error = %e, "cover art fetch failed");
            return None;
        }
    };
    if !response.status().is_success() {
        tracing::warn!(url = %reference.url, status = %response.status(), "cover art fetch failed");
        return None;
    }

    let header_mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let mime_type = image_mime_type(header_mime.as_deref(), &reference.url);

    match response.bytes().await {
        Ok(bytes) if !bytes.is_empty() => Some(EmbeddedArt {
            data: bytes.to_vec(),
            mime_type,
        }),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(url = %reference.url, error = %e, "cover art body read failed");
            None
        }
    }
}

/// LRCLIB get-by-id payload; only the lyrics bodies matter here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LyricsPayload {
    synced_lyrics: Option<String>,
    plain_lyrics: Option<String>,
}

/// Fetch lyric text, preferring synced (LRC) over plain lyrics.
pub async fn fetch_lyrics(reference: &LyricsRef) -> Option<String> {
    let response = match reqwest::get(&reference.locator).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(locator = %reference.locator, error = %e, "lyrics fetch failed");
            return None;
        }
    };
    if !response.status().is_success() {
        tracing::warn!(locator = %reference.locator, status = %response.status(), "lyrics fetch failed");
        return None;
    }

    let payload: LyricsPayload = match response.json().await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(locator = %reference.locator, error = %e, "lyrics payload parse failed");
            return None;
        }
    };

    payload
        .synced_lyrics
        .or(payload.plain_lyrics)
        .map(|s| s.trim_end().to_string())
        .filter(|s| !s.is_empty())
}

fn mime_type_of(mime: &str) -> MimeType {
    match mime {
        "image/jpeg" => MimeType::Jpeg,
        "image/png" => MimeType::Png,
        "image/gif" => MimeType::Gif,
        other => MimeType::Unknown(other.to_string()),
    }
}

/// Pick an image MIME type from the Content-Type header, falling back to the
/// URL's file extension, defaulting to JPEG.
fn image_mime_type(header: Option<&str>, url: &str) -> String {
    if let Some(mime) = header {
        if mime.starts_with("image/") && mime.len() > "image/".len() {
            return mime.to_string();
        }
    }
    let ext = url
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let ext = match ext.as_str() {
        "jpg" | "jpeg" => "jpeg",
        "png" => "png",
        "gif" => "gif",
        "webp" => "webp",
        _ => "jpeg",
    };
    format!("image/{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{Field, ProviderId};
    use std::io::Write as _;
    use tempfile::NamedTempFile;

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
    fn test_write_to_non_audio_file_is_an_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "This is just some text, not music.").expect("Failed to write");

        let result = write(file.path(), &record("Song", "Artist"), None, None);

        assert!(matches!(result, Err(TagError::Open { .. })));
    }

    #[test]
    fn test_final_filename() {
        let r = record("Shake It Off", "Taylor Swift");
        assert_eq!(final_filename(&r, "mp3"), "Taylor Swift - Shake It Off.mp3");
    }

    #[test]
    fn test_final_filename_sanitizes() {
        let r = record("What/Ever: Part 1?", "AC/DC");
        let name = final_filename(&r, "mp3");
        assert!(!name.contains('/'));
        assert!(name.ends_with(".mp3"));
    }

    #[test]
    fn test_final_filename_without_artist() {
        let r = record("Shake It Off", "");
        assert_eq!(final_filename(&r, "opus"), "Shake It Off.opus");
    }

    #[test]
    fn test_image_mime_type_prefers_header() {
        assert_eq!(
            image_mime_type(Some("image/png"), "https://x/cover.jpg"),
            "image/png"
        );
    }

    #[test]
    fn test_image_mime_type_falls_back_to_extension() {
        assert_eq!(image_mime_type(None, "https://x/cover.webp"), "image/webp");
        assert_eq!(image_mime_type(None, "https://x/cover.jpg"), "image/jpeg");
        assert_eq!(
            image_mime_type(Some("text/html"), "https://x/front"),
            "image/jpeg"
        );
    }

    #[test]
    fn test_lyrics_payload_parses() {
        let json = r#"{"id": 42, "trackName": "x", "syncedLyrics": "[00:01.00] hi", "plainLyrics": "hi"}"#;
        let payload: LyricsPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.synced_lyrics.as_deref(), Some("[00:01.00] hi"));
    }
}
