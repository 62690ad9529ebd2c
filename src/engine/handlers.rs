//! Mode handlers: single-file upload and directory (batch) upload.

use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

use crate::pipeline::run_batch;
use crate::remote::{Uploader, upload_one};
use crate::{Opts, UploadOpts};

/// Single-file mode: one direct upload, no pipeline. False when the upload failed.
pub fn handle_file(opts: &Opts, uploader: &dyn Uploader) -> bool {
    if upload_one(uploader, &opts.src_path, &opts.dst_path, opts.overwrite) {
        info!("Finished successfully.");
        true
    } else {
        error!("Failed to upload file to Yandex Disk.");
        false
    }
}

/// Directory mode: run the pipeline and report the summary. False when any upload failed or the walk aborted.
pub fn handle_dir(opts: &Opts, uploader: Arc<dyn Uploader>) -> Result<bool> {
    let upload_opts = UploadOpts::from(opts);
    let summary = run_batch(&opts.src_path, uploader, &upload_opts)?;

    if let Some(ref msg) = summary.walk_error {
        error!("Walk aborted: {}", msg);
    }
    if summary.is_success() {
        info!(
            "Finished successfully ({} of {} files uploaded).",
            summary.attempted, summary.discovered
        );
        Ok(true)
    } else {
        error!(
            "Finished with errors: {} failed upload(s), {} attempted, {} discovered.",
            summary.errors, summary.attempted, summary.discovered
        );
        Ok(false)
    }
}
