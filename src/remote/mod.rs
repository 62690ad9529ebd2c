//! Remote side of an upload: the [`Uploader`] seam and the Yandex Disk client behind it.

pub mod yandex;

use anyhow::Result;
use log::{error, info};
use std::path::Path;

pub use yandex::{DiskClient, DiskClientConfig};

/// Uploads one local file to one remote path. Implementations own their retry and timeout policy.
pub trait Uploader: Send + Sync {
    fn upload(&self, src: &Path, dst: &str, overwrite: bool) -> Result<()>;
}

/// Single-file mode: upload `src` to `dst`, logging the cause on failure. True on success.
pub fn upload_one(uploader: &dyn Uploader, src: &Path, dst: &str, overwrite: bool) -> bool {
    match uploader.upload(src, dst, overwrite) {
        Ok(()) => {
            info!("Uploaded {} -> {}", src.display(), dst);
            true
        }
        Err(e) => {
            error!("Upload of {} -> {} failed: {:#}", src.display(), dst, e);
            false
        }
    }
}
