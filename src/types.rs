//! Public and internal types for the backyard API and pipeline.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::config::{PipelineConsts, RemoteConsts};

/// One file to upload: where it lives locally and where it goes relative to the upload root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilePair {
    /// Path of the regular file as produced by the walk.
    pub source: PathBuf,
    /// Root-relative destination, `/`-separated with a leading `/` (e.g. `/sub/b.txt`).
    pub destination: String,
}

impl FilePair {
    pub fn new(source: PathBuf, destination: String) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// A failed upload of one [`FilePair`]. The cause comes from the uploader.
#[derive(Debug)]
pub struct UploadError {
    pub pair: FilePair,
    pub cause: anyhow::Error,
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {:#}",
            self.pair.source.display(),
            self.pair.destination,
            self.cause
        )
    }
}

/// Outcome of a batch (directory) run, built by the completion monitor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Number of upload errors observed on the error channel.
    pub errors: usize,
    /// Uploads attempted by the coordinator.
    pub attempted: usize,
    /// Pairs emitted by the enumerator.
    pub discovered: usize,
    /// First walk error, when enumeration was aborted.
    pub walk_error: Option<String>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.errors == 0 && self.walk_error.is_none()
    }
}

/// Options for the batch pipeline. Built from CLI + config file, or directly by lib callers.
#[derive(Clone, Debug)]
pub struct UploadOpts {
    /// Remote directory the tree is uploaded under (e.g. `/backups/photos`).
    pub dst_root: String,
    /// Allow overwriting existing remote files.
    pub overwrite: bool,
    /// Fan out uploads across several workers. When false, upload one at a time.
    pub concurrent: bool,
    /// Worker count when `concurrent`. None: derived from available threads.
    pub workers: Option<usize>,
    /// How long the monitor waits on the error channel before logging a heartbeat.
    pub poll_interval: Duration,
}

impl Default for UploadOpts {
    fn default() -> Self {
        Self {
            dst_root: "/".to_string(),
            overwrite: false,
            concurrent: true,
            workers: None,
            poll_interval: Duration::from_secs(PipelineConsts::POLL_INTERVAL_SECS),
        }
    }
}

impl UploadOpts {
    /// Effective number of upload workers.
    pub fn worker_count(&self) -> usize {
        if !self.concurrent {
            return 1;
        }
        self.workers
            .unwrap_or_else(|| rayon::current_num_threads().min(PipelineConsts::MAX_UPLOAD_WORKERS))
            .max(1)
    }
}

/// Full options (CLI). Use [`UploadOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    pub src_path: PathBuf,
    pub dst_path: String,
    pub token_file: PathBuf,
    pub overwrite: bool,
    pub sequential: bool,
    pub workers: Option<usize>,
    pub api_url: String,
    /// Per-request timeout in seconds.
    pub timeout: u64,
    pub retries: u32,
    /// Monitor heartbeat interval in seconds.
    pub poll_interval: u64,
    pub debug: bool,
    pub json_log: bool,
    pub log_caller: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            src_path: PathBuf::new(),
            dst_path: String::new(),
            token_file: crate::utils::config::PackagePaths::get().default_token_file(),
            overwrite: false,
            sequential: false,
            workers: None,
            api_url: RemoteConsts::DEFAULT_API_URL.to_string(),
            timeout: RemoteConsts::REQUEST_TIMEOUT_SECS,
            retries: RemoteConsts::DEFAULT_RETRIES,
            poll_interval: PipelineConsts::POLL_INTERVAL_SECS,
            debug: false,
            json_log: false,
            log_caller: false,
        }
    }
}

impl From<&Opts> for UploadOpts {
    fn from(o: &Opts) -> Self {
        UploadOpts {
            dst_root: o.dst_path.clone(),
            overwrite: o.overwrite,
            concurrent: !o.sequential,
            workers: o.workers,
            poll_interval: Duration::from_secs(o.poll_interval.max(1)),
        }
    }
}
