//! Media classification and filename derivation from asset URLs.
//!
//! The service does not label assets; the only signal is the file extension
//! of the resolved download URL.

use serde::Serialize;

/// Extensions classified as video; everything else (including no extension)
/// is a photo.
const VIDEO_EXTENSIONS: &[&str] = &["mov", "mp4", "m4v", "avi", "wmv", "webm"];

/// Fallback when a URL yields no usable filename.
const DEFAULT_FILENAME: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MediaType::Photo => "photo",
            MediaType::Video => "video",
        })
    }
}

/// Classifies a download URL by its file extension, case-insensitively.
pub fn classify(url: &str) -> MediaType {
    let name = last_path_segment(url).unwrap_or_default();
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return MediaType::Photo,
    };
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaType::Video
    } else {
        MediaType::Photo
    }
}

/// Derives a local filename from a download URL: the last path segment with
/// the query stripped, sanitized for the filesystem. Falls back to
/// `"unknown"` when the URL yields nothing usable.
pub fn filename_from_url(url: &str) -> String {
    let raw = match last_path_segment(url) {
        Some(s) => s,
        None => return DEFAULT_FILENAME.to_string(),
    };
    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// Last non-empty path segment of `url`, query and fragment excluded.
fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    Some(segment.to_string())
}

/// Replaces characters that are unsafe in a filename and caps the length at
/// NAME_MAX (255 bytes).
fn sanitize_filename(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '\0' || c == '/' || c == '\\' || c.is_control() {
            out.push('_');
        } else {
            out.push(c);
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.');
    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}
