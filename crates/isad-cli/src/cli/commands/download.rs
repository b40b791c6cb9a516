//! `isad download` – scan an album, then run the download scheduler with
//! progress rendering and Ctrl-C cancellation.

use anyhow::Result;
use isad_core::config::IsadConfig;
use isad_core::control::CancelToken;
use isad_core::saver::CurlSaver;
use isad_core::scheduler::{progress_channel, DownloadScheduler, MediaFilter};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::format::human_bytes;

pub async fn run_download(
    cfg: &IsadConfig,
    url: &str,
    filter: MediaFilter,
    dir: Option<PathBuf>,
    folder: Option<String>,
) -> Result<()> {
    let result = super::scan_remote(cfg, url).await?;
    if result.total_items == 0 {
        println!("Album is empty; nothing to download.");
        return Ok(());
    }
    println!(
        "Album {}: {} item(s), {}",
        result.token,
        result.total_items,
        human_bytes(result.total_size)
    );

    let base_dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let folder = folder.unwrap_or_else(|| format!("shared-album-{}", result.token));
    let dest = base_dir.join(folder);

    let saver = Arc::new(CurlSaver::new(Duration::from_secs(cfg.connect_timeout_secs)));
    let scheduler = DownloadScheduler::new(saver, cfg.max_concurrent_downloads);
    let (progress_tx, mut progress_rx) = progress_channel(64);

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\ncancelling; in-flight downloads will finish");
                cancel.cancel();
            }
        });
    }

    let render = tokio::spawn(async move {
        while let Some(state) = progress_rx.recv().await {
            print!(
                "\r  {}/{} downloaded, {} failed",
                state.completed, state.total, state.failed
            );
            let _ = std::io::stdout().flush();
            if !state.active {
                break;
            }
        }
        println!();
    });

    let state = scheduler
        .run(
            result.items,
            filter,
            dest.clone(),
            Some(progress_tx),
            cancel.clone(),
        )
        .await?;
    let _ = render.await;

    if cancel.is_cancelled() {
        println!(
            "Cancelled: {} of {} item(s) settled before stopping.",
            state.completed + state.failed,
            state.total
        );
    }
    println!(
        "Done: {} completed, {} failed (of {}). Saved to {}",
        state.completed,
        state.failed,
        state.total,
        dest.display()
    );
    if !state.errors.is_empty() {
        println!("Failed items:");
        for e in &state.errors {
            println!("  {}: {}", e.filename, e.error);
        }
    }
    if state.failed > 0 {
        anyhow::bail!("{} download(s) failed", state.failed);
    }
    Ok(())
}
