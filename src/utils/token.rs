//! OAuth token loading: env var → .env in the working dir → token file.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

use crate::utils::config::PackagePaths;

fn try_env_then_dotenv(dir: &Path) -> Option<String> {
    let key = PackagePaths::TOKEN_ENV;
    if let Ok(s) = std::env::var(key) {
        let s = s.trim().to_string();
        if !s.is_empty() {
            return Some(s);
        }
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        if let Ok(s) = std::env::var(key) {
            let s = s.trim().to_string();
            if !s.is_empty() {
                return Some(s);
            }
        }
    }
    None
}

/// Strip trailing line endings the way the token file is usually written (`echo token > passwd`).
pub fn trim_token(raw: &str) -> &str {
    raw.trim_end_matches(['\n', '\r'])
}

/// Read the token from `token_file`. Fails when the file is unreadable or holds no token.
pub fn read_oauth_token(token_file: &Path) -> Result<String> {
    info!("Reading OAuth token.");
    let abs = std::path::absolute(token_file).unwrap_or_else(|_| token_file.to_path_buf());
    let content = std::fs::read_to_string(&abs)
        .with_context(|| format!("Failed to read OAuth token from {}", abs.display()))?;
    let token = trim_token(&content);
    if token.trim().is_empty() {
        anyhow::bail!("OAuth token file {} is empty", abs.display());
    }
    Ok(token.to_string())
}

/// Resolve the token: `BACKYARD_TOKEN` env → `.env` in `dir` → `token_file`.
pub fn load_token(dir: &Path, token_file: &Path) -> Result<String> {
    if let Some(s) = try_env_then_dotenv(dir) {
        debug!("OAuth token found in environment");
        return Ok(s);
    }
    read_oauth_token(token_file)
}
