//! Engine module: CLI surface, mode handlers and path tools

pub mod arg_parser;
pub mod cli;
pub mod handlers;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use handlers::{handle_dir, handle_file};
pub use tools::{join_remote, path_to_remote_string, remote_ancestors, remote_relative};
