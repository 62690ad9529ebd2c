//! Backyard CLI: upload a file or a directory tree to Yandex Disk.

use backyard::engine::arg_parser::Cli;
use backyard::engine::handle_run;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse_args(std::env::args_os());
    let code = match handle_run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    };
    log::debug!("Total time: {:?}", start_time.elapsed());
    code
}
