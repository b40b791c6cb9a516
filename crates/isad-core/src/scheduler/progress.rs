//! Best-effort progress broadcasting.
//!
//! The channel is bounded and the send never blocks: a full or closed
//! receiver simply drops the snapshot. A missing observer must never stall
//! or fail the scheduler.

use super::state::DownloadState;

pub type ProgressReceiver = tokio::sync::mpsc::Receiver<DownloadState>;

/// Sending half of the progress channel.
#[derive(Debug, Clone)]
pub struct ProgressSender(tokio::sync::mpsc::Sender<DownloadState>);

/// Creates a progress channel holding up to `capacity` pending snapshots.
pub fn progress_channel(capacity: usize) -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = tokio::sync::mpsc::channel(capacity);
    (ProgressSender(tx), rx)
}

impl ProgressSender {
    /// Fire-and-forget push of a snapshot. Failure is swallowed.
    pub fn broadcast(&self, state: &DownloadState) {
        let _ = self.0.try_send(state.clone());
    }
}
