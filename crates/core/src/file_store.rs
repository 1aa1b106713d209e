// SPDX-License-Identifier: MIT

//! Atomic read/write of JSON and plain-text files (§4.1).
//!
//! Every write serializes to a temp file beside the target, fsyncs it, and
//! renames it over the target. The temp suffix combines the process id and
//! a per-process monotonic counter so that concurrent tasks inside the same
//! process never collide on the same temp path.

use crate::error::FileStoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn tmp_path_for(target: &Path) -> PathBuf {
    let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let pid = std::process::id();
    let file_name = target.file_name().and_then(|n| n.to_str()).unwrap_or("tmp");
    let suffix = format!(".{pid}-{n}.tmp");
    target.with_file_name(format!("{file_name}{suffix}"))
}

/// Write `body` atomically to `path`, creating parent directories as needed.
pub fn write_text(path: &Path, body: &str) -> Result<(), FileStoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|source| FileStoreError::Io { path: path.to_path_buf(), source })?;
    }
    let tmp = tmp_path_for(path);
    let write_result = (|| -> std::io::Result<()> {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(body.as_bytes())?;
        file.sync_all()?;
        Ok(())
    })();
    if let Err(source) = write_result {
        let _ = std::fs::remove_file(&tmp);
        return Err(FileStoreError::Io { path: path.to_path_buf(), source });
    }
    std::fs::rename(&tmp, path).map_err(|source| {
        let _ = std::fs::remove_file(&tmp);
        FileStoreError::Io { path: path.to_path_buf(), source }
    })
}

/// Read the text content at `path`. Returns `Ok(None)` if the file is
/// absent rather than an error — callers treat `NotFound` as "absent", not
/// a failure.
pub fn read_text(path: &Path) -> Result<Option<String>, FileStoreError> {
    match std::fs::read_to_string(path) {
        Ok(body) => Ok(Some(body)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(FileStoreError::Io { path: path.to_path_buf(), source }),
    }
}

/// Serialize `value` as pretty JSON and write it atomically.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), FileStoreError> {
    let body = serde_json::to_string_pretty(value).map_err(|e| FileStoreError::Corrupt {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    write_text(path, &format!("{body}\n"))
}

/// Read and deserialize a JSON value. `Ok(None)` if the file is absent;
/// `Err(Corrupt)` if it exists but fails to parse.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, FileStoreError> {
    let Some(body) = read_text(path)? else { return Ok(None) };
    serde_json::from_str(&body).map(Some).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "corrupt json file");
        FileStoreError::Corrupt { path: path.to_path_buf(), detail: e.to_string() }
    })
}

#[cfg(test)]
#[path = "file_store_tests.rs"]
mod tests;
