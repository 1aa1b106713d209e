// SPDX-License-Identifier: MIT

//! Sanitized environment for agent subprocesses (§4.3, §6.7).
//!
//! Every backend CLI refuses to run nested inside a session it thinks it
//! already owns, detected through a marker environment variable each CLI
//! sets for its own children. Kingdom spawns backends as children of its
//! own process, which may itself be running inside one of those same
//! backends (e.g. Kingdom invoked from within a Claude Code session) — so
//! the marker must be stripped before every spawn, or the child refuses to
//! start.

use std::collections::HashMap;

/// Backend-nested-session markers known to cause spawn refusals. One entry
/// per supported backend; extend this list when a new backend adapter is
/// added.
pub const NESTED_SESSION_MARKERS: &[&str] =
    &["CLAUDECODE", "CLAUDE_CODE", "CODEX_SANDBOX", "CURSOR_TRACE_ID"];

/// Build a sanitized copy of the current process environment: every
/// variable from the parent, minus the nested-session markers.
pub fn sanitized_env() -> HashMap<String, String> {
    sanitize(std::env::vars())
}

/// Sanitize an arbitrary environment iterator (used by tests that don't
/// want to depend on the real process environment).
pub fn sanitize(vars: impl IntoIterator<Item = (String, String)>) -> HashMap<String, String> {
    vars.into_iter().filter(|(k, _)| !NESTED_SESSION_MARKERS.contains(&k.as_str())).collect()
}

#[cfg(test)]
#[path = "process_env_tests.rs"]
mod tests;
