//! Upload coordinator: drains the pair channel through the uploader and reports failures.

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crate::engine::tools::join_remote;
use crate::remote::Uploader;
use crate::{FilePair, UploadError, UploadOpts};

/// Single upload worker: take pairs until the channel is closed and drained, send one error per failure.
fn upload_worker_loop(
    pair_rx: &Receiver<FilePair>,
    error_tx: Sender<UploadError>,
    uploader: &dyn Uploader,
    opts: &UploadOpts,
    attempted: &AtomicUsize,
) {
    while let Ok(pair) = pair_rx.recv() {
        attempted.fetch_add(1, Ordering::Relaxed);
        let remote = join_remote(&opts.dst_root, &pair.destination);
        match uploader.upload(&pair.source, &remote, opts.overwrite) {
            Ok(()) => info!("Uploaded {} -> {}", pair.source.display(), remote),
            Err(cause) => {
                if let Err(unsent) = error_tx.send(UploadError { pair, cause }) {
                    debug!(
                        "coordinator: error receiver gone, dropping failure: {}",
                        unsent.into_inner()
                    );
                }
            }
        }
    }
    drop(error_tx);
}

/// Batch mode: consume `pair_rx` until it is closed and drained, uploading every pair.
/// Fans out over [`UploadOpts::worker_count`] scoped workers. `error_tx` (and every worker clone)
/// is dropped before returning, which closes the error channel. Returns the number of uploads attempted.
pub fn upload_many(
    pair_rx: Receiver<FilePair>,
    error_tx: Sender<UploadError>,
    uploader: &dyn Uploader,
    opts: &UploadOpts,
) -> usize {
    let workers = opts.worker_count();
    debug!("coordinator: {} upload worker(s)", workers);
    let attempted = AtomicUsize::new(0);
    thread::scope(|s| {
        for _ in 0..workers {
            let error_tx = error_tx.clone();
            let pair_rx = &pair_rx;
            let attempted = &attempted;
            s.spawn(move || upload_worker_loop(pair_rx, error_tx, uploader, opts, attempted));
        }
        // Workers hold the only remaining senders.
        drop(error_tx);
    });
    let attempted = attempted.into_inner();
    debug!("coordinator: pair channel drained, {} uploads attempted", attempted);
    attempted
}

/// Run [`upload_many`] on its own thread.
pub fn spawn_upload_coordinator(
    pair_rx: Receiver<FilePair>,
    error_tx: Sender<UploadError>,
    uploader: Arc<dyn Uploader>,
    opts: UploadOpts,
) -> JoinHandle<usize> {
    thread::spawn(move || upload_many(pair_rx, error_tx, uploader.as_ref(), &opts))
}
