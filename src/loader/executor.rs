//! Completion executors.
//!
//! The adapter decides synchronously and hands the completion call to one of
//! these. Hosts that require completions on a particular thread or queue
//! supply their own implementation.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A deferred completion call.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs completion jobs on the context the host requires.
///
/// Implementations must run every job they accept exactly once.
pub trait CompletionExecutor: Send + Sync {
    fn execute(&self, job: Job);
}

/// Runs each job immediately on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl CompletionExecutor for InlineExecutor {
    fn execute(&self, job: Job) {
        job();
    }
}

/// Runs jobs one at a time, in submission order, on a single tokio task.
#[derive(Debug, Clone)]
pub struct SerialExecutor {
    tx: mpsc::UnboundedSender<Job>,
}

impl SerialExecutor {
    /// Spawn the queue worker on the current runtime.
    ///
    /// The worker exits once every `SerialExecutor` clone is dropped. A job
    /// that panics is logged and dropped; the jobs queued behind it still run.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let handle = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
                    let message = panic
                        .downcast_ref::<&str>()
                        .copied()
                        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
                        .unwrap_or("non-string panic payload");
                    tracing::error!(panic = %message, "Completion job panicked");
                }
            }
            tracing::debug!("Completion queue drained");
        });
        (Self { tx }, handle)
    }
}

impl CompletionExecutor for SerialExecutor {
    fn execute(&self, job: Job) {
        if let Err(mpsc::error::SendError(job)) = self.tx.send(job) {
            tracing::warn!("Completion queue closed, completing on caller");
            job();
        }
    }
}
