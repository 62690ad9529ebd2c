//! Load `backyard.toml` (CLI only). Lib callers pass [`UploadOpts`](crate::UploadOpts) directly.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BackyardToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    token_file: Option<String>,
    overwrite: Option<bool>,
    sequential: Option<bool>,
    workers: Option<usize>,
    api_url: Option<String>,
    timeout: Option<u64>,
    retries: Option<u32>,
    poll_interval: Option<u64>,
    debug: Option<bool>,
    json_log: Option<bool>,
    log_caller: Option<bool>,
}

/// Load the config file at `path` if present. Returns None if missing or unreadable; a malformed file is logged and ignored.
pub(crate) fn load_backyard_toml(path: &Path) -> Option<BackyardToml> {
    let s = std::fs::read_to_string(path).ok()?;
    parse_backyard_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub(crate) fn parse_backyard_toml(s: &str) -> Result<BackyardToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $section.$field {
            $opts.$field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI. Paths to upload are never in the file.
pub(crate) fn apply_file_to_opts(file: &BackyardToml, opts: &mut Opts) {
    let s = &file.settings;
    if let Some(ref p) = s.token_file {
        opts.token_file = PathBuf::from(p);
    }
    if let Some(ref url) = s.api_url {
        opts.api_url = url.clone();
    }
    if let Some(n) = s.workers {
        opts.workers = Some(n);
    }
    apply_file_opt!(s, opts, overwrite);
    apply_file_opt!(s, opts, sequential);
    apply_file_opt!(s, opts, timeout);
    apply_file_opt!(s, opts, retries);
    apply_file_opt!(s, opts, poll_interval);
    apply_file_opt!(s, opts, debug);
    apply_file_opt!(s, opts, json_log);
    apply_file_opt!(s, opts, log_caller);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let file = parse_backyard_toml(
            r#"
            [settings]
            overwrite = true
            workers = 3
            retries = 0
            api_url = "http://localhost:9999"
            "#,
        )
        .unwrap();
        let mut opts = Opts::default();
        apply_file_to_opts(&file, &mut opts);
        assert!(opts.overwrite);
        assert_eq!(opts.workers, Some(3));
        assert_eq!(opts.retries, 0);
        assert_eq!(opts.api_url, "http://localhost:9999");
        assert!(!opts.sequential);
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let file = parse_backyard_toml("").unwrap();
        let mut opts = Opts::default();
        let before = opts.clone();
        apply_file_to_opts(&file, &mut opts);
        assert_eq!(opts.timeout, before.timeout);
        assert_eq!(opts.token_file, before.token_file);
    }

    #[test]
    fn malformed_file_is_rejected() {
        assert!(parse_backyard_toml("[settings]\nworkers = \"many\"").is_err());
    }
}
