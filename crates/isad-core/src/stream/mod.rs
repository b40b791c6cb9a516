//! Sharedstreams protocol: wire models, the two-call client, and metadata
//! normalization.
//!
//! A scan is `fetch_metadata` → `parse_assets` → `resolve_asset_urls`,
//! strictly sequential. See [`crate::scan`] for the composed pipeline.

mod client;
mod metadata;
mod parse;

pub use client::{StreamClient, MAX_HOST_REDIRECTS};
pub use metadata::{AssetLocation, AssetUrlsResponse, Derivative, PhotoEntry, StreamMetadata};
pub use parse::{parse_assets, CandidateAsset};
