//! Crash-safe file helpers for persisted bot state
//!
//! All persisted rewrites (timezone map, per-user reminder lists) go through
//! [`write_atomic`]: write a sibling temp file, then rename over the target.
//! A crash mid-write can leave a stale temp file behind but never a truncated
//! or half-written target.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::io;
use std::path::{Path, PathBuf};

/// Sibling temp path used during an atomic rewrite of `path`.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "state".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Atomically replace the contents of `path` with `bytes`.
///
/// The temp file lives in the same directory as the target so the final
/// rename never crosses a filesystem boundary.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await
}

/// Read a file, mapping "not found" to `None` instead of an error.
pub async fn read_if_exists(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
