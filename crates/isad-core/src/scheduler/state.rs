//! Run state and item filtering.

use serde::Serialize;

use crate::media::MediaType;

/// A failed item: filename plus the error it failed with, in settlement
/// order (not enqueue order).
#[derive(Debug, Clone, Serialize)]
pub struct ItemError {
    pub filename: String,
    pub error: String,
}

/// Aggregate state of one download run. Owned by the run loop; observers
/// only ever see clones. `completed + failed <= total` holds at every
/// snapshot, and equals `total` at the final broadcast of an uncancelled
/// run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadState {
    /// True from run start until the in-flight set drains.
    pub active: bool,
    /// Number of items after filtering; fixed for the lifetime of the run.
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    /// Carried for interface parity but never incremented: no operation
    /// defines it.
    pub skipped: usize,
    pub errors: Vec<ItemError>,
}

/// Which media types a run downloads. Applied before `total` is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaFilter {
    #[default]
    All,
    Photos,
    Videos,
}

impl MediaFilter {
    pub fn matches(self, media: MediaType) -> bool {
        match self {
            MediaFilter::All => true,
            MediaFilter::Photos => media == MediaType::Photo,
            MediaFilter::Videos => media == MediaType::Video,
        }
    }
}

impl std::str::FromStr for MediaFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(MediaFilter::All),
            "photos" => Ok(MediaFilter::Photos),
            "videos" => Ok(MediaFilter::Videos),
            other => Err(format!(
                "unknown filter '{other}' (expected all, photos, or videos)"
            )),
        }
    }
}

impl std::fmt::Display for MediaFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MediaFilter::All => "all",
            MediaFilter::Photos => "photos",
            MediaFilter::Videos => "videos",
        })
    }
}
