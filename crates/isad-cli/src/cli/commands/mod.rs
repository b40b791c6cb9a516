mod download;
mod scan;

pub use download::run_download;
pub use scan::run_scan;

use anyhow::{Context, Result};
use isad_core::config::IsadConfig;
use isad_core::scan::{self as core_scan, ScanResult};
use isad_core::stream::StreamClient;
use std::time::Duration;

/// Runs the blocking scan pipeline off the async runtime.
pub(crate) async fn scan_remote(cfg: &IsadConfig, album_url: &str) -> Result<ScanResult> {
    let client = StreamClient::new(
        &cfg.default_host,
        Duration::from_secs(cfg.connect_timeout_secs),
    );
    let album_url = album_url.to_string();
    let result = tokio::task::spawn_blocking(move || core_scan::scan_album(&client, &album_url))
        .await
        .context("scan task join")??;
    Ok(result)
}
