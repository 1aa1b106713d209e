// SPDX-License-Identifier: MIT

//! kingdom-adapters: one [`agent::AgentAdapter`] implementation per backend
//! CLI, a shared retry/timeout/stream-tee [`query::query`] contract, and a
//! name-keyed [`registry::default_registry`].

pub mod agent;
pub mod claude;
pub mod codex;
pub mod cursor;
pub mod query;
pub mod registry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use agent::{AdapterError, AgentAdapter, AgentResponse, CommandContext};
pub use claude::ClaudeAdapter;
pub use codex::CodexAdapter;
pub use cursor::CursorAdapter;
pub use query::query;
