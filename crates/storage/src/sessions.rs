// SPDX-License-Identifier: MIT

//! Per-(member, branch) [`AgentSession`] persistence (§4.6, §6.1:
//! `branches/<b>/sessions/<member>.json`). Readers load-then-write; two
//! processes writing the same member's session concurrently is outside the
//! shared-resource policy, not guarded against here.

use crate::paths::KdPaths;
use kingdom_core::{AgentSession, KdError};

pub fn read_session(paths: &KdPaths, normalized_name: &str, member: &str) -> Result<Option<AgentSession>, KdError> {
    let path = paths.session_path(normalized_name, member);
    Ok(kingdom_core::file_store::read_json(&path)?)
}

pub fn write_session(paths: &KdPaths, normalized_name: &str, session: &AgentSession) -> Result<(), KdError> {
    let path = paths.session_path(normalized_name, &session.member);
    kingdom_core::file_store::write_json(&path, session)?;
    Ok(())
}

pub fn delete_session(paths: &KdPaths, normalized_name: &str, member: &str) -> Result<(), KdError> {
    let path = paths.session_path(normalized_name, member);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(KdError::Io(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trips_a_session_and_deletes_it() {
        let tmp = tempdir().unwrap();
        let paths = KdPaths::new(tmp.path());
        assert!(read_session(&paths, "feature-x", "codex").unwrap().is_none());

        let session = AgentSession::new("codex", "2026-01-01T00:00:00Z");
        write_session(&paths, "feature-x", &session).unwrap();
        let loaded = read_session(&paths, "feature-x", "codex").unwrap().unwrap();
        assert_eq!(loaded.member, "codex");
        assert!(loaded.session_id.is_none());

        delete_session(&paths, "feature-x", "codex").unwrap();
        assert!(read_session(&paths, "feature-x", "codex").unwrap().is_none());
        // Deleting an already-absent session is not an error.
        delete_session(&paths, "feature-x", "codex").unwrap();
    }
}
