//! CLI command handler: build options (defaults < config file < flags), load the token, then upload
//! a single file or a directory depending on what `--srcpath` is.

use anyhow::{Context, Result};
use log::{debug, info};
use std::sync::Arc;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::handlers::{handle_dir, handle_file};
use crate::remote::{DiskClient, DiskClientConfig};
use crate::utils::backyard_toml::{apply_file_to_opts, load_backyard_toml};
use crate::utils::config::PackagePaths;
use crate::utils::{LogFormat, load_token, setup_logging};

/// Override opts field from the command line when the flag was given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $cli.$field {
            $opts.$field = v;
        }
    };
}

fn setup_opts(cli: &Cli) -> Opts {
    let mut opts = Opts::default();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PackagePaths::get().default_config_file());
    let file = load_backyard_toml(&config_path);
    if let Some(ref file) = file {
        apply_file_to_opts(file, &mut opts);
    }

    opts.src_path = cli.srcpath.clone();
    opts.dst_path = cli.dstpath.clone();
    if let Some(ref p) = cli.token_file {
        opts.token_file = p.clone();
    }
    if let Some(ref url) = cli.api_url {
        opts.api_url = url.clone();
    }
    if cli.workers.is_some() {
        opts.workers = cli.workers;
    }
    apply_cli_opt!(cli, opts, overwrite);
    apply_cli_opt!(cli, opts, sequential);
    apply_cli_opt!(cli, opts, timeout);
    apply_cli_opt!(cli, opts, retries);
    apply_cli_opt!(cli, opts, debug);
    apply_cli_opt!(cli, opts, json_log);
    apply_cli_opt!(cli, opts, log_caller);

    setup_logging(LogFormat {
        debug: opts.debug,
        json: opts.json_log,
        caller: opts.log_caller,
    });
    if file.is_some() {
        debug!("Loaded config from {}", config_path.display());
    }
    opts
}

/// Run one invocation. `Ok(true)` when everything was uploaded, `Ok(false)` when an upload failed.
/// `Err` is a configuration error (paths, token, client setup) raised before any upload starts.
pub fn handle_run(cli: &Cli) -> Result<bool> {
    let opts = setup_opts(cli);
    info!(
        "{} {} starting (pid {}).",
        PackagePaths::get().pkg_name(),
        env!("CARGO_PKG_VERSION"),
        std::process::id()
    );
    debug!("{:#?}", opts);

    if opts.src_path.as_os_str().is_empty() {
        anyhow::bail!("You must set '--srcpath'.");
    }
    if opts.dst_path.trim().is_empty() {
        anyhow::bail!("You must set '--dstpath'.");
    }
    let src_meta = std::fs::metadata(&opts.src_path)
        .with_context(|| format!("Cannot access source path {}", opts.src_path.display()))?;

    let cwd = std::env::current_dir().context("get current directory")?;
    let token = load_token(&cwd, &opts.token_file)?;

    let mut config = DiskClientConfig::new(opts.api_url.clone(), token);
    config.timeout = std::time::Duration::from_secs(opts.timeout.max(1));
    config.retries = opts.retries;
    let client = DiskClient::new(config)?;

    if src_meta.is_dir() {
        info!("Source path is a directory.");
        handle_dir(&opts, Arc::new(client))
    } else {
        info!("Source path is a file.");
        Ok(handle_file(&opts, &client))
    }
}
