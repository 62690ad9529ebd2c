pub mod backyard_toml;
pub mod config;
pub mod logger;
pub mod token;

pub use config::*;
pub use logger::{LogFormat, setup_logging};
pub use token::{load_token, read_oauth_token, trim_token};
