use clap::{CommandFactory, Parser};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;

/// Upload a file, or every regular file under a directory, to Yandex Disk.
#[derive(Clone, Parser)]
#[command(name = "backyard", version)]
#[command(about = "Upload a file or a directory tree to Yandex Disk.")]
pub struct Cli {
    /// Source file or directory.
    #[arg(long, value_name = "PATH")]
    pub srcpath: PathBuf,

    /// Destination path (file) or remote folder the tree is uploaded under (directory).
    #[arg(long, value_name = "PATH")]
    pub dstpath: String,

    /// File with OAuth token. Default: ~/.config/yandex-disk/passwd. BACKYARD_TOKEN takes precedence.
    #[arg(long, alias = "tokenFile", value_name = "FILE")]
    pub token_file: Option<PathBuf>,

    /// Overwrite destination files.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub overwrite: Option<bool>,

    /// Upload one file at a time instead of fanning out over several workers.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub sequential: Option<bool>,

    /// Number of concurrent upload workers. Default: available threads, capped at 8.
    #[arg(long, short = 'w', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Per-request timeout in seconds.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub timeout: Option<u64>,

    /// Retries per request on network errors, 429 and 5xx.
    #[arg(long, value_parser = clap::value_parser!(u32))]
    pub retries: Option<u32>,

    /// Log debug messages.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub debug: Option<bool>,

    /// Log in JSON format.
    #[arg(long, alias = "jsonLog", num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub json_log: Option<bool>,

    /// Log message caller (file and line number).
    #[arg(long, alias = "logCaller", num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub log_caller: Option<bool>,

    /// Config file. Default: ~/.config/backyard/backyard.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// API base URL.
    #[arg(long, hide = true)]
    pub api_url: Option<String>,
}

impl Cli {
    /// Parse like [`Parser::parse_from`], also accepting single-dash long flags (`-srcpath x`,
    /// `-tokenFile=f`, `-version`) as older scripts pass them.
    pub fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_single_dash_longs(args))
    }
}

/// Long names and aliases clap knows for [`Cli`], plus `help` and `version`.
fn known_long_names() -> HashSet<String> {
    let cmd = Cli::command();
    let mut names: HashSet<String> = ["help", "version"].iter().map(|s| s.to_string()).collect();
    for arg in cmd.get_arguments() {
        if let Some(long) = arg.get_long() {
            names.insert(long.to_string());
        }
        if let Some(aliases) = arg.get_all_aliases() {
            names.extend(aliases.into_iter().map(str::to_string));
        }
    }
    names
}

/// Rewrite `-name` / `-name=value` to `--name` / `--name=value` when `name` is a known long flag.
/// Short flags (`-w 4`), unknown words and everything after a bare `--` are left untouched.
pub fn normalize_single_dash_longs<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let known = known_long_names();
    let mut after_separator = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg: OsString| {
            if after_separator {
                return arg;
            }
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if s == "--" {
                after_separator = true;
                return arg;
            }
            let Some(rest) = s.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') || rest.len() < 2 {
                return arg;
            }
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if known.contains(name) {
                OsString::from(format!("-{s}"))
            } else {
                arg
            }
        })
        .collect()
}
