//! The run loop: fill the pool up to the limit, settle one, repeat.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::task::JoinSet;

use crate::control::CancelToken;
use crate::saver::{SaveError, Saver};
use crate::scan::ResolvedItem;

use super::progress::ProgressSender;
use super::state::{DownloadState, ItemError, MediaFilter};

#[derive(Debug, Error)]
pub enum RunError {
    /// A second run was requested while one is active. Runs never overlap;
    /// callers wait for or cancel the current one first.
    #[error("a download run is already in progress")]
    AlreadyRunning,
}

/// Schedules downloads with a fixed concurrency limit. One run at a time.
pub struct DownloadScheduler {
    saver: Arc<dyn Saver>,
    max_concurrent: usize,
    running: AtomicBool,
    last_state: Mutex<DownloadState>,
}

impl DownloadScheduler {
    pub fn new(saver: Arc<dyn Saver>, max_concurrent: usize) -> Self {
        Self {
            saver,
            max_concurrent: max_concurrent.max(1),
            running: AtomicBool::new(false),
            last_state: Mutex::new(DownloadState::default()),
        }
    }

    /// Snapshot of the most recently published state (zeroed before the
    /// first run).
    pub fn last_state(&self) -> DownloadState {
        self.last_state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Runs one download batch: filters `items`, downloads them into `dir`
    /// with at most `max_concurrent` in flight, and returns the final state.
    ///
    /// Every settlement publishes a snapshot; a final inactive snapshot is
    /// published when the in-flight set drains, whether by exhaustion or
    /// cancellation. Per-item failures are recorded and never abort the run.
    pub async fn run(
        &self,
        items: Vec<ResolvedItem>,
        filter: MediaFilter,
        dir: PathBuf,
        progress: Option<ProgressSender>,
        cancel: CancelToken,
    ) -> Result<DownloadState, RunError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(RunError::AlreadyRunning);
        }
        let _guard = RunningGuard(&self.running);

        let mut queue: VecDeque<ResolvedItem> = items
            .into_iter()
            .filter(|item| filter.matches(item.media_type))
            .collect();

        let mut state = DownloadState {
            active: true,
            total: queue.len(),
            ..DownloadState::default()
        };
        tracing::info!(total = state.total, %filter, "download run started");
        self.publish(&state, progress.as_ref());

        let mut in_flight: JoinSet<(String, Result<PathBuf, SaveError>)> = JoinSet::new();

        loop {
            // Cancellation is checked per dequeue: nothing new starts, but
            // whatever is in flight settles and is counted.
            while in_flight.len() < self.max_concurrent && !cancel.is_cancelled() {
                let Some(item) = queue.pop_front() else {
                    break;
                };
                let saver = Arc::clone(&self.saver);
                let dir = dir.clone();
                in_flight.spawn(async move {
                    let filename = item.filename.clone();
                    let result = match tokio::task::spawn_blocking(move || {
                        saver.save(&item.url, &dir, &item.filename)
                    })
                    .await
                    {
                        Ok(result) => result,
                        Err(e) => Err(SaveError::Task(e.to_string())),
                    };
                    (filename, result)
                });
            }

            let Some(settled) = in_flight.join_next().await else {
                break;
            };
            match settled {
                Ok((filename, Ok(path))) => {
                    state.completed += 1;
                    tracing::debug!(%filename, path = %path.display(), "download complete");
                }
                Ok((filename, Err(e))) => {
                    state.failed += 1;
                    tracing::warn!(%filename, error = %e, "download failed");
                    state.errors.push(ItemError {
                        filename,
                        error: e.to_string(),
                    });
                }
                Err(join_err) => {
                    state.failed += 1;
                    state.errors.push(ItemError {
                        filename: "(task)".to_string(),
                        error: join_err.to_string(),
                    });
                }
            }
            self.publish(&state, progress.as_ref());
        }

        state.active = false;
        tracing::info!(
            completed = state.completed,
            failed = state.failed,
            total = state.total,
            cancelled = cancel.is_cancelled(),
            "download run finished"
        );
        self.publish(&state, progress.as_ref());
        Ok(state)
    }

    fn publish(&self, state: &DownloadState, progress: Option<&ProgressSender>) {
        *self
            .last_state
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = state.clone();
        if let Some(progress) = progress {
            progress.broadcast(state);
        }
    }
}

struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
