//! Metadata normalization: one candidate per asset, largest variant wins.

use super::metadata::StreamMetadata;

/// One asset with its representative variant selected. Carried forward even
/// when no variant exists (`checksum: None`); such assets drop out at URL
/// resolution, never as a parse failure.
#[derive(Debug, Clone)]
pub struct CandidateAsset {
    pub photo_guid: String,
    /// Checksum of the largest variant; `None` when the asset has zero
    /// variants.
    pub checksum: Option<String>,
    /// Declared size of the selected variant in bytes (0 when unknown).
    pub file_size: u64,
    pub date_created: Option<String>,
    pub caption: Option<String>,
    pub batch_guid: Option<String>,
}

/// Flattens the metadata into candidates. An absent asset list yields an
/// empty vec. For each asset the variant with the numerically largest
/// declared size is selected; ties keep the first one encountered (the
/// derivative map carries no meaningful order, so ties are not
/// deterministic).
pub fn parse_assets(metadata: &StreamMetadata) -> Vec<CandidateAsset> {
    let photos = match &metadata.photos {
        Some(photos) => photos,
        None => return Vec::new(),
    };

    photos
        .iter()
        .map(|photo| {
            let mut best: Option<(String, u64)> = None;
            for derivative in photo.derivatives.values() {
                let Some(checksum) = &derivative.checksum else {
                    continue;
                };
                let size = derivative.size_bytes();
                if best.as_ref().map_or(true, |(_, s)| size > *s) {
                    best = Some((checksum.clone(), size));
                }
            }

            let (checksum, file_size) = match best {
                Some((checksum, size)) => (Some(checksum), size),
                None => (None, 0),
            };

            CandidateAsset {
                photo_guid: photo.photo_guid.clone(),
                checksum,
                file_size,
                date_created: photo.date_created.clone(),
                caption: photo.caption.clone(),
                batch_guid: photo.batch_guid.clone(),
            }
        })
        .collect()
}
