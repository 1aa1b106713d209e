// SPDX-License-Identifier: MIT

//! [`PeasantSession`] persistence at `branches/<b>/peasants/<name>.json`
//! (§4.8). Not part of §6.1's filesystem tree, which only enumerates agent
//! `sessions/`; added as an implementation binding (see DESIGN.md).

use crate::paths::KdPaths;
use kingdom_core::{KdError, PeasantSession};

pub fn read(paths: &KdPaths, normalized_name: &str, session_name: &str) -> Result<Option<PeasantSession>, KdError> {
    let path = paths.peasant_session_path(normalized_name, session_name);
    Ok(kingdom_core::file_store::read_json(&path)?)
}

pub fn write(paths: &KdPaths, normalized_name: &str, session: &PeasantSession) -> Result<(), KdError> {
    let path = paths.peasant_session_path(normalized_name, &session.name);
    kingdom_core::file_store::write_json(&path, session)?;
    Ok(())
}

pub fn delete(paths: &KdPaths, normalized_name: &str, session_name: &str) -> Result<(), KdError> {
    let path = paths.peasant_session_path(normalized_name, session_name);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(KdError::Io(e.to_string())),
    }
}

/// All recorded peasant sessions under a branch, sorted by name.
pub fn list(paths: &KdPaths, normalized_name: &str) -> Result<Vec<PeasantSession>, KdError> {
    let dir = paths.branch_peasants_dir(normalized_name);
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names: Vec<String> = std::fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .filter_map(|e| e.path().file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .collect();
    names.sort();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        if let Some(session) = read(paths, normalized_name, &name)? {
            out.push(session);
        }
    }
    Ok(out)
}

/// Any other recorded session in `normalized_name` whose mode is
/// [`kingdom_core::PeasantMode::Hand`] — used by `Peasant::start` to refuse a
/// second concurrent hand session in the same base directory (§4.8 step 3).
pub fn find_active_hand_session(paths: &KdPaths, normalized_name: &str) -> Result<Option<PeasantSession>, KdError> {
    Ok(list(paths, normalized_name)?.into_iter().find(|s| s.is_hand()))
}
