//! `isad scan` – scan an album and print its contents.

use anyhow::Result;
use isad_core::config::IsadConfig;

use crate::cli::format::human_bytes;

pub async fn run_scan(cfg: &IsadConfig, url: &str, json: bool) -> Result<()> {
    let result = super::scan_remote(cfg, url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "Album {}: {} item(s), {} photo(s), {} video(s), {}",
        result.token,
        result.total_items,
        result.photos,
        result.videos,
        human_bytes(result.total_size)
    );
    for item in &result.items {
        println!(
            "  {:<5} {:>10}  {}",
            item.media_type.to_string(),
            human_bytes(item.file_size),
            item.filename
        );
    }
    Ok(())
}
