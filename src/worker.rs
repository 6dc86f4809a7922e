//! Background execution for callers that must stay responsive.
//!
//! A job owns one worker thread that runs the blocking compression and hands
//! the outcome back over a channel. Nothing is cancelled unless the caller
//! asks for it.

use crate::error::{CompressionError, Result};
use crate::launcher::{CancelToken, ProcessLauncher};
use crate::report::CompressionResult;
use crate::request::CompressionRequest;
use crate::runner::CompressionRunner;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub struct CompressionJob {
    receiver: Receiver<Result<CompressionResult>>,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

/// Start compressing `request` on a worker thread.
pub fn spawn_compression<L>(
    runner: Arc<CompressionRunner<L>>,
    request: CompressionRequest,
) -> Result<CompressionJob>
where
    L: ProcessLauncher + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let cancel = CancelToken::new();
    let options = runner
        .launch_options()
        .clone()
        .with_cancel_token(cancel.clone());

    let handle = thread::Builder::new()
        .name("pdf-squeeze-worker".to_string())
        .spawn(move || {
            let outcome = runner.run_with(&request, &options);
            // The receiver may already be gone if the caller dropped the job
            let _ = sender.send(outcome);
        })?;

    Ok(CompressionJob {
        receiver,
        cancel,
        handle: Some(handle),
    })
}

impl CompressionJob {
    /// Block until the worker delivers its outcome.
    pub fn wait(mut self) -> Result<CompressionResult> {
        let outcome = self.receiver.recv().unwrap_or(Err(CompressionError::Cancelled));
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        outcome
    }

    /// Poll without blocking; `None` while the worker is still running.
    pub fn try_result(&mut self) -> Option<Result<CompressionResult>> {
        match self.receiver.try_recv() {
            Ok(outcome) => {
                if let Some(handle) = self.handle.take() {
                    let _ = handle.join();
                }
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CompressionError::Cancelled)),
        }
    }

    /// Ask the worker to terminate the running Ghostscript process.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}
