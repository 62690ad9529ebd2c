//! Backyard: upload a file or a whole directory tree to Yandex Disk.

pub mod engine;
pub mod pipeline;
pub mod remote;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;
use std::path::Path;
use std::sync::Arc;

pub use remote::Uploader;

/// Result alias used by public backyard API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Upload every regular file under `root` with `uploader`, placing them under `opts.dst_root`.
///
/// Failed uploads do not stop the run; they are counted in [`BatchSummary::errors`]. Check
/// [`BatchSummary::is_success`] for the overall outcome.
///
/// ```ignore
/// let client = backyard::remote::DiskClient::new(DiskClientConfig::new(url, token))?;
/// let opts = UploadOpts { dst_root: "/backups".into(), overwrite: true, ..Default::default() };
/// let summary = backyard::upload_dir(Path::new("photos"), Arc::new(client), &opts)?;
/// ```
pub fn upload_dir(root: &Path, uploader: Arc<dyn Uploader>, opts: &UploadOpts) -> Result<BatchSummary> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    pipeline::run_batch(root, uploader, opts)
}
