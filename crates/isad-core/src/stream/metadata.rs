//! Serde models for the sharedstreams wire protocol.
//!
//! The service is loose with shapes: lists can be absent, `fileSize` arrives
//! as a JSON string or number, and unknown fields come and go. Every field
//! here is optional unless the protocol cannot work without it.

use serde::Deserialize;
use std::collections::HashMap;

/// Response of `POST {base}/webstream`: the raw album metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamMetadata {
    /// Asset list; absent means an empty album, not an error.
    #[serde(default)]
    pub photos: Option<Vec<PhotoEntry>>,
    /// When present (typically with HTTP 330), the service wants the same
    /// request reissued against this host.
    #[serde(default, rename = "X-Apple-MMe-Host")]
    pub host_override: Option<String>,
}

/// One asset in the album. Videos are also `photos` entries; the media type
/// is only known once the download URL's extension is seen.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoEntry {
    #[serde(rename = "photoGuid")]
    pub photo_guid: String,
    /// Variants keyed by an opaque derivative name. May be empty for
    /// placeholder assets.
    #[serde(default)]
    pub derivatives: HashMap<String, Derivative>,
    #[serde(default, rename = "dateCreated")]
    pub date_created: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default, rename = "batchGuid")]
    pub batch_guid: Option<String>,
}

/// One variant of an asset (thumbnail, medium, original, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Derivative {
    #[serde(default)]
    pub checksum: Option<String>,
    /// String or number on the wire; see [`Derivative::size_bytes`].
    #[serde(default, rename = "fileSize")]
    pub file_size: Option<serde_json::Value>,
}

impl Derivative {
    /// Declared size in bytes; non-numeric or missing sizes count as 0.
    pub fn size_bytes(&self) -> u64 {
        match &self.file_size {
            Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
            Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }
}

/// Response of `POST {base}/webasseturls`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetUrlsResponse {
    /// Keyed by derivative checksum. A checksum the caller asked about may
    /// be absent (thumbnail-only assets).
    #[serde(default)]
    pub items: HashMap<String, AssetLocation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetLocation {
    pub url_location: String,
    pub url_path: String,
}

impl AssetLocation {
    /// Full download URL: `https://{url_location}{url_path}`.
    pub fn download_url(&self) -> String {
        format!("https://{}{}", self.url_location, self.url_path)
    }
}
