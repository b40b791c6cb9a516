//! File saving: the narrow interface the scheduler downloads through, and
//! its curl-backed implementation.
//!
//! Collision policy belongs to the saver, not the scheduler: an existing
//! file is never overwritten, the new one is auto-renamed `name (1).ext`,
//! `name (2).ext`, ...

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Errors from a single save. Recorded per item by the scheduler; one bad
/// item never sinks the batch.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("{0}")]
    Transport(#[from] curl::Error),
    #[error("HTTP {0}")]
    Http(u32),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("save task failed: {0}")]
    Task(String),
}

/// External save operation: fetch `url` and store it under `dir/filename`
/// (or a renamed variant on collision). Blocking; the scheduler calls it
/// through `spawn_blocking`.
pub trait Saver: Send + Sync {
    fn save(&self, url: &str, dir: &Path, filename: &str) -> Result<PathBuf, SaveError>;
}

/// Real saver: single curl GET streamed straight to the destination file.
#[derive(Debug, Clone)]
pub struct CurlSaver {
    connect_timeout: Duration,
}

impl CurlSaver {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Saver for CurlSaver {
    fn save(&self, url: &str, dir: &Path, filename: &str) -> Result<PathBuf, SaveError> {
        fs::create_dir_all(dir)?;
        let (dest, mut file) = create_unique(dir, filename)?;

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;

        let mut write_err: Option<std::io::Error> = None;
        let perform_result = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match file.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Err(e) = perform_result {
            drop(file);
            let _ = fs::remove_file(&dest);
            return Err(match write_err {
                Some(io) => SaveError::Io(io),
                None => SaveError::Transport(e),
            });
        }

        let status = easy.response_code()?;
        if !(200..300).contains(&status) {
            drop(file);
            let _ = fs::remove_file(&dest);
            return Err(SaveError::Http(status));
        }

        file.flush()?;
        tracing::debug!(path = %dest.display(), "saved");
        Ok(dest)
    }
}

/// Creates `dir/filename`, renaming to `name (n).ext` until a fresh file can
/// be created. `create_new` makes the claim atomic.
fn create_unique(dir: &Path, filename: &str) -> Result<(PathBuf, fs::File), SaveError> {
    let mut candidate = filename.to_string();
    let mut n = 0u32;
    loop {
        let path = dir.join(&candidate);
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                n += 1;
                candidate = renamed(filename, n);
            }
            Err(e) => return Err(SaveError::Io(e)),
        }
    }
}

fn renamed(filename: &str, n: u32) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({n}).{ext}"),
        _ => format!("{filename} ({n})"),
    }
}
