//! Completion monitor: starts the walk and the coordinator, counts upload errors, decides the outcome.

use anyhow::Result;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, error, info};
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::pipeline::{
    PipelineContext, WalkReport, create_pipeline_channels, spawn_upload_coordinator,
    spawn_walk_thread,
};
use crate::remote::Uploader;
use crate::{BatchSummary, UploadError, UploadOpts};

/// Monitor progress. `Running` until the error channel is seen closed and drained, `Draining` while
/// the producer threads are joined, `Done` once the outcome is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonitorState {
    Running,
    Draining,
    Done,
}

/// Error counter plus the state it is in. Only the monitor thread touches it.
#[derive(Debug)]
pub struct Monitor {
    state: MonitorState,
    errors: usize,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitor {
    pub fn new() -> Self {
        Self {
            state: MonitorState::Running,
            errors: 0,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Apply one receive result. Ignored unless `Running`.
    pub fn observe(&mut self, received: Result<UploadError, RecvTimeoutError>) {
        if self.state != MonitorState::Running {
            return;
        }
        match received {
            Ok(err) => {
                error!("{}", err);
                self.errors += 1;
            }
            Err(RecvTimeoutError::Timeout) => {
                debug!("monitor: still waiting, {} error(s) so far", self.errors);
            }
            Err(RecvTimeoutError::Disconnected) => {
                info!("Error channel is closed.");
                self.state = MonitorState::Draining;
            }
        }
    }

    /// Block on `error_rx` until it is closed and drained, at most `poll_interval` per wait so a
    /// heartbeat is logged while uploads are slow.
    pub fn watch(&mut self, error_rx: &Receiver<UploadError>, poll_interval: Duration) {
        while self.state == MonitorState::Running {
            self.observe(error_rx.recv_timeout(poll_interval));
        }
    }

    /// Producers joined: `Draining` → `Done`. Returns the final error count.
    pub fn finish(&mut self) -> usize {
        if self.state == MonitorState::Draining {
            self.state = MonitorState::Done;
        }
        debug!("monitor: {:?}", self.state);
        self.errors
    }
}

/// Count errors on `error_rx` until it is closed and drained.
pub fn monitor_errors(error_rx: &Receiver<UploadError>, poll_interval: Duration) -> usize {
    let mut monitor = Monitor::new();
    monitor.watch(error_rx, poll_interval);
    monitor.finish()
}

fn join_thread<T>(handle: JoinHandle<T>, name: &str) -> Result<T> {
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("{} thread panicked", name))
}

/// Batch mode entry point: walk `root`, upload every regular file under `opts.dst_root`, and
/// return once both channels are closed and drained.
/// Per-file failures are counted in the summary, not returned as `Err`; `Err` means a pipeline thread panicked.
pub fn run_batch(root: &Path, uploader: Arc<dyn Uploader>, opts: &UploadOpts) -> Result<BatchSummary> {
    let channels = create_pipeline_channels();
    let ctx = PipelineContext::new(root);
    let first_error = Arc::clone(&ctx.first_error);

    let coordinator = spawn_upload_coordinator(
        channels.pair_rx,
        channels.error_tx,
        uploader,
        opts.clone(),
    );
    let walk = spawn_walk_thread(channels.pair_tx, ctx);

    info!(
        "Starting a waiting loop (poll interval {:?}).",
        opts.poll_interval
    );
    let mut monitor = Monitor::new();
    monitor.watch(&channels.error_rx, opts.poll_interval);

    // Draining: the coordinator closed the error channel, so both producers are finishing.
    let attempted = join_thread(coordinator, "upload coordinator")?;
    let WalkReport { discovered } = join_thread(walk, "walk")?;
    let walk_error = first_error.lock().ok().and_then(|mut slot| slot.take());

    let errors = monitor.finish();
    Ok(BatchSummary {
        errors,
        attempted,
        discovered,
        walk_error,
    })
}
