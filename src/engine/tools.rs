//! Path utilities: local walk paths → remote destinations.

use anyhow::Result;
use std::path::{Component, Path};

/// Join the normal components of `path` with `/`. Separators inside a component are kept as-is
/// (`\` is an ordinary filename character on Unix). Fails on a component that is not valid UTF-8.
pub fn path_to_remote_string(path: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for c in path.components() {
        if let Component::Normal(s) = c {
            let part = s.to_str().ok_or_else(|| {
                anyhow::anyhow!("{}: file name is not valid UTF-8", path.display())
            })?;
            parts.push(part);
        }
    }
    Ok(parts.join("/"))
}

/// Destination of `path` relative to the walk `root`, with a leading `/` (e.g. `/sub/b.txt`).
/// `Ok(None)` when `path` is not under `root` or is `root` itself.
pub fn remote_relative(path: &Path, root: &Path) -> Result<Option<String>> {
    let Ok(rel) = path.strip_prefix(root) else {
        return Ok(None);
    };
    let rel = path_to_remote_string(rel)?;
    if rel.is_empty() {
        return Ok(None);
    }
    Ok(Some(format!("/{rel}")))
}

/// Join a remote root (`/backups`, `disk:/backups/`, `/`) and a root-relative destination (`/a.txt`).
pub fn join_remote(root: &str, destination: &str) -> String {
    let root = root.trim_end_matches('/');
    let destination = destination.trim_start_matches('/');
    if destination.is_empty() {
        return if root.is_empty() { "/".to_string() } else { root.to_string() };
    }
    format!("{root}/{destination}")
}

/// Parent directories of a remote path, outermost first, excluding the disk root.
/// `/a/b/c.txt` → `["/a", "/a/b"]`; `disk:/a/c.txt` → `["disk:/a"]`.
pub fn remote_ancestors(remote: &str) -> Vec<String> {
    let (scheme, rest) = match remote.split_once(":/") {
        Some((scheme, rest)) => (format!("{scheme}:"), rest),
        None => (String::new(), remote),
    };
    let parts: Vec<&str> = rest.split('/').filter(|p| !p.is_empty()).collect();
    if parts.len() < 2 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(parts.len() - 1);
    let mut acc = scheme;
    for part in &parts[..parts.len() - 1] {
        acc.push('/');
        acc.push_str(part);
        out.push(acc.clone());
    }
    out
}
