//! Pipeline context and channels: shared data passed into the walk thread and the channel pair.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::utils::config::PipelineConsts;
use crate::{FilePair, UploadError};

/// Shared context for the walk. Built in `run_batch` and moved into the walk thread.
pub struct PipelineContext {
    pub root: PathBuf,
    /// First walk error; set once, read by the monitor after the walk thread is joined.
    pub first_error: Arc<Mutex<Option<String>>>,
}

impl PipelineContext {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            first_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Record `msg` unless an earlier error was already recorded.
    pub fn record_error(&self, msg: String) {
        if let Ok(mut slot) = self.first_error.lock() {
            slot.get_or_insert(msg);
        }
    }
}

/// The two channels of one batch run. The walk gets `pair_tx`; the coordinator gets `pair_rx` and
/// `error_tx`; the monitor keeps `error_rx`. Each sender has exactly one owner, so dropping it closes the channel.
pub struct PipelineChannels {
    pub pair_tx: Sender<FilePair>,
    pub pair_rx: Receiver<FilePair>,
    pub error_tx: Sender<UploadError>,
    pub error_rx: Receiver<UploadError>,
}

pub fn create_pipeline_channels() -> PipelineChannels {
    let (pair_tx, pair_rx) = bounded::<FilePair>(PipelineConsts::PAIR_CHANNEL_CAP);
    let (error_tx, error_rx) = unbounded::<UploadError>();
    PipelineChannels {
        pair_tx,
        pair_rx,
        error_tx,
        error_rx,
    }
}
