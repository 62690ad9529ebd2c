//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::path::PathBuf;
use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names and default locations: built once, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    config_dir: PathBuf,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Token env var checked before the token file.
    pub const TOKEN_ENV: &'static str = "BACKYARD_TOKEN";

    /// Build and cache paths from `CARGO_PKG_NAME` and the user's config dir. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!("{pkg}.toml"),
                config_dir: dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// `<config dir>/backyard/backyard.toml`
    pub fn default_config_file(&self) -> PathBuf {
        self.config_dir
            .join(self.pkg_name)
            .join(&self.config_filename)
    }

    /// `<config dir>/yandex-disk/passwd`, where the Yandex Disk CLI keeps its token.
    pub fn default_token_file(&self) -> PathBuf {
        self.config_dir.join("yandex-disk").join("passwd")
    }
}

// ---- Pipeline ----

/// Channel sizes, worker limits and monitor timing.
pub struct PipelineConsts;

impl PipelineConsts {
    /// FilePair channel capacity. The walk blocks once this many pairs are waiting for upload.
    pub const PAIR_CHANNEL_CAP: usize = 64;
    /// Upper bound on upload workers when the count is derived from available threads.
    pub const MAX_UPLOAD_WORKERS: usize = 8;
    /// Monitor heartbeat interval (seconds).
    pub const POLL_INTERVAL_SECS: u64 = 1;
}

// ---- Remote ----

/// Yandex Disk API defaults.
pub struct RemoteConsts;

impl RemoteConsts {
    pub const DEFAULT_API_URL: &'static str = "https://cloud-api.yandex.net";
    /// Per-request timeout (seconds).
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;
    /// Retries for transport errors, 429 and 5xx.
    pub const DEFAULT_RETRIES: u32 = 3;
    /// Backoff step between retries (ms); attempt `n` waits `n * RETRY_BACKOFF_MS`.
    pub const RETRY_BACKOFF_MS: u64 = 500;
}
