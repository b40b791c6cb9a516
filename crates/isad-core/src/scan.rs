//! The scan pipeline: token → metadata → candidates → resolved items.
//!
//! All-or-nothing: any protocol or transport failure aborts the scan and
//! nothing partial is returned. Runs blocking network calls in the current
//! thread; call from `spawn_blocking` if used from async code.

use serde::Serialize;

use crate::error::ScanError;
use crate::media::{self, MediaType};
use crate::stream::{parse_assets, StreamClient};
use crate::token::CollectionToken;

/// One downloadable item. Only assets whose checksum resolved to a URL make
/// it here; thumbnail-only assets are silently dropped.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedItem {
    pub photo_guid: String,
    pub checksum: String,
    pub url: String,
    pub filename: String,
    pub media_type: MediaType,
    pub file_size: u64,
    pub date_created: Option<String>,
}

/// Immutable result of one scan. Owned by the caller; read-only downstream.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub total_items: usize,
    pub photos: usize,
    pub videos: usize,
    pub total_size: u64,
    pub items: Vec<ResolvedItem>,
    pub base_url: String,
    pub token: String,
}

/// Scans the shared album behind `album_url`: extracts the token, fetches
/// and normalizes the metadata, and resolves every candidate to a download
/// URL in one batched call.
pub fn scan_album(client: &StreamClient, album_url: &str) -> Result<ScanResult, ScanError> {
    let token = CollectionToken::from_album_url(album_url)?;
    let (metadata, base_url) = client.fetch_metadata(&token)?;
    let candidates = parse_assets(&metadata);

    if candidates.is_empty() {
        tracing::info!(token = %token, "album is empty");
        return Ok(ScanResult {
            total_items: 0,
            photos: 0,
            videos: 0,
            total_size: 0,
            items: Vec::new(),
            base_url,
            token: token.as_str().to_string(),
        });
    }

    let guids: Vec<String> = candidates.iter().map(|c| c.photo_guid.clone()).collect();
    let url_map = client.resolve_asset_urls(&base_url, &guids)?;

    let mut items = Vec::new();
    let mut photos = 0usize;
    let mut videos = 0usize;
    let mut total_size = 0u64;

    for candidate in candidates {
        let Some(checksum) = candidate.checksum else {
            continue;
        };
        // No URL for this checksum: thumbnail-only asset, not an error.
        let Some(url) = url_map.get(&checksum) else {
            tracing::debug!(guid = %candidate.photo_guid, "no download URL resolved; dropping");
            continue;
        };

        let media_type = media::classify(url);
        match media_type {
            MediaType::Photo => photos += 1,
            MediaType::Video => videos += 1,
        }
        total_size += candidate.file_size;

        items.push(ResolvedItem {
            photo_guid: candidate.photo_guid,
            checksum,
            url: url.clone(),
            filename: media::filename_from_url(url),
            media_type,
            file_size: candidate.file_size,
            date_created: candidate.date_created,
        });
    }

    tracing::info!(
        total = items.len(),
        photos,
        videos,
        total_size,
        "scan complete"
    );

    Ok(ScanResult {
        total_items: items.len(),
        photos,
        videos,
        total_size,
        items,
        base_url,
        token: token.as_str().to_string(),
    })
}
