//! Foreground completion context.
//!
//! Requests run on a background runtime; their completions are posted to a
//! [`ForegroundQueue`] that the host drains on its interactive thread. Jobs
//! run in the order they were posted, on whichever thread drains the queue.

use std::fmt;

use tokio::sync::mpsc;
use tracing::warn;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle used to post work to the foreground.
#[derive(Clone)]
pub struct Foreground {
    sender: mpsc::UnboundedSender<Job>,
}

impl fmt::Debug for Foreground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Foreground")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

impl Foreground {
    /// Post `job` to the foreground queue.
    ///
    /// If the queue was dropped, the job is discarded with a warning.
    pub fn dispatch(&self, job: impl FnOnce() + Send + 'static) {
        if self.sender.send(Box::new(job)).is_err() {
            warn!("foreground queue dropped, discarding completion");
        }
    }
}

/// Queue of foreground jobs, owned by the thread that runs them.
pub struct ForegroundQueue {
    receiver: mpsc::UnboundedReceiver<Job>,
    handle: Foreground,
}

impl fmt::Debug for ForegroundQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForegroundQueue")
            .field("pending", &self.receiver.len())
            .finish()
    }
}

impl Default for ForegroundQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ForegroundQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            receiver,
            handle: Foreground { sender },
        }
    }

    /// Handle for posting jobs to this queue.
    #[must_use]
    pub fn handle(&self) -> Foreground {
        self.handle.clone()
    }

    /// Run every job already queued, without waiting. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Wait for the next job and run it.
    pub async fn run_next(&mut self) {
        // The queue holds a sender itself, so the channel never closes here.
        if let Some(job) = self.receiver.recv().await {
            job();
        }
    }
}
