//! Bounded-concurrency download scheduler.
//!
//! Runs a filtered item list through the [`crate::saver::Saver`] with at
//! most `max_concurrent` downloads in flight, accumulating per-item
//! success/failure and broadcasting a state snapshot on every settlement.

mod progress;
mod run;
mod state;

pub use progress::{progress_channel, ProgressReceiver, ProgressSender};
pub use run::{DownloadScheduler, RunError};
pub use state::{DownloadState, ItemError, MediaFilter};
