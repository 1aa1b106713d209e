// SPDX-License-Identifier: MIT

//! Backend name → adapter lookup (§4.4, §9 "dynamic dispatch over backends").

use crate::agent::AgentAdapter;
use crate::claude::ClaudeAdapter;
use crate::codex::CodexAdapter;
use crate::cursor::CursorAdapter;
use std::collections::HashMap;
use std::sync::Arc;

/// The adapters Kingdom ships with, keyed by the name used in
/// `agents.<name>.cli` config (§4.11). `Arc`, not `Box`, since Council fans
/// out member queries across `tokio::spawn` tasks that each need their own
/// owned handle to the adapter.
pub fn default_registry() -> HashMap<String, Arc<dyn AgentAdapter>> {
    let mut map: HashMap<String, Arc<dyn AgentAdapter>> = HashMap::new();
    map.insert("claude".to_string(), Arc::new(ClaudeAdapter));
    map.insert("codex".to_string(), Arc::new(CodexAdapter));
    map.insert("cursor".to_string(), Arc::new(CursorAdapter));
    map
}
