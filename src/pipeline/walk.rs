//! File enumerator: walks the source tree and sends one [`FilePair`] per regular file.

use crossbeam_channel::Sender;
use log::{debug, error, info};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crate::FilePair;
use crate::engine::tools::remote_relative;

use super::context::PipelineContext;

/// One result from a directory walk: a regular file, something to skip, or an error.
pub enum WalkOutcome {
    File(PathBuf),
    Skip,
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`]. Only regular files are kept; symlinks are not followed.
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_file() => WalkOutcome::File(entry.into_path()),
        Ok(_) => WalkOutcome::Skip,
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

fn walkdir_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    use walkdir::WalkDir;
    Box::new(
        WalkDir::new(&ctx.root)
            .follow_links(false)
            .into_iter()
            .map(to_outcome_walkdir),
    )
}

/// What the walk reports back through its join handle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkReport {
    /// Pairs sent on the channel.
    pub discovered: usize,
}

pub fn spawn_walk_thread(pair_tx: Sender<FilePair>, ctx: PipelineContext) -> JoinHandle<WalkReport> {
    thread::spawn(move || {
        let iter = walkdir_iter(&ctx);
        run_walk_loop(pair_tx, &ctx, iter)
    })
}

/// Consume `iter`, send a [`FilePair`] for every file under `ctx.root`, and drop `pair_tx` when done.
/// A walk error is recorded in `ctx.first_error` and stops the walk. A file whose name has no remote
/// form (not UTF-8) is recorded the same way but only that file is skipped. A hung-up receiver stops the walk.
/// Taking `pair_tx` by value means the channel closes exactly once, on every return path.
pub fn run_walk_loop<I>(pair_tx: Sender<FilePair>, ctx: &PipelineContext, iter: I) -> WalkReport
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut report = WalkReport::default();
    for outcome in iter {
        match outcome {
            WalkOutcome::File(path) => {
                let destination = match remote_relative(&path, &ctx.root) {
                    Ok(Some(destination)) => destination,
                    Ok(None) => continue,
                    Err(e) => {
                        // No destination can represent this name; skip it but fail the run.
                        error!("Skipping {}: {:#}", path.display(), e);
                        ctx.record_error(format!("{:#}", e));
                        continue;
                    }
                };
                info!(
                    "Adding pair to the input channel: {} -> {}",
                    path.display(),
                    destination
                );
                if pair_tx.send(FilePair::new(path, destination)).is_err() {
                    debug!("walk: pair channel closed by consumer, stopping");
                    break;
                }
                report.discovered += 1;
            }
            WalkOutcome::Skip => {}
            WalkOutcome::Err { msg, path } => {
                let msg = match path {
                    Some(p) if !msg.contains(&p.display().to_string()) => {
                        format!("{}: {}", p.display(), msg)
                    }
                    _ => msg,
                };
                ctx.record_error(msg);
                break;
            }
        }
    }
    drop(pair_tx);
    debug!("walk: done, {} pairs sent", report.discovered);
    report
}
