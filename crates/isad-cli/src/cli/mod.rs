//! CLI for the isad shared-album downloader.

mod commands;
mod format;

use anyhow::Result;
use clap::{Parser, Subcommand};
use isad_core::config;
use isad_core::scheduler::MediaFilter;
use std::path::PathBuf;

use commands::{run_download, run_scan};

/// Top-level CLI for the isad shared-album downloader.
#[derive(Debug, Parser)]
#[command(name = "isad")]
#[command(about = "isad: download iCloud Shared Albums", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Scan a shared album and print what it contains.
    Scan {
        /// Shared album URL (https://www.icloud.com/sharedalbum/#TOKEN).
        url: String,

        /// Print the scan result as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Scan a shared album and download its items.
    Download {
        /// Shared album URL (https://www.icloud.com/sharedalbum/#TOKEN).
        url: String,

        /// Which media types to download: all, photos, or videos.
        #[arg(long, default_value = "all")]
        filter: MediaFilter,

        /// Directory downloads go into (default: current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Subfolder inside the target directory (default: shared-album-TOKEN).
        #[arg(long, value_name = "NAME")]
        folder: Option<String>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Scan { url, json } => run_scan(&cfg, &url, json).await?,
            CliCommand::Download {
                url,
                filter,
                dir,
                folder,
            } => run_download(&cfg, &url, filter, dir, folder).await?,
        }

        Ok(())
    }
}
