// SPDX-License-Identifier: MIT

//! Filesystem layout under `.kd/` (§6.1). A single struct computes every
//! path the rest of the crate needs; nothing else in this crate builds a
//! path by hand, so the layout is defined exactly once.

use kingdom_core::ThreadId;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct KdPaths {
    root: PathBuf,
}

impl KdPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kd_dir(&self) -> PathBuf {
        self.root.join(".kd")
    }

    pub fn config_path(&self) -> PathBuf {
        self.kd_dir().join("config.json")
    }

    pub fn backlog_dir(&self) -> PathBuf {
        self.kd_dir().join("backlog")
    }

    pub fn backlog_tickets_dir(&self) -> PathBuf {
        self.backlog_dir().join("tickets")
    }

    pub fn branches_dir(&self) -> PathBuf {
        self.kd_dir().join("branches")
    }

    pub fn branch_dir(&self, normalized_name: &str) -> PathBuf {
        self.branches_dir().join(normalized_name)
    }

    pub fn branch_state_path(&self, normalized_name: &str) -> PathBuf {
        self.branch_dir(normalized_name).join("state.json")
    }

    pub fn branch_design_path(&self, normalized_name: &str) -> PathBuf {
        self.branch_dir(normalized_name).join("design.md")
    }

    pub fn branch_tickets_dir(&self, normalized_name: &str) -> PathBuf {
        self.branch_dir(normalized_name).join("tickets")
    }

    pub fn branch_threads_dir(&self, normalized_name: &str) -> PathBuf {
        self.branch_dir(normalized_name).join("threads")
    }

    pub fn thread_dir(&self, normalized_name: &str, thread_id: &ThreadId) -> PathBuf {
        self.branch_threads_dir(normalized_name).join(thread_id.as_str())
    }

    pub fn thread_meta_path(&self, normalized_name: &str, thread_id: &ThreadId) -> PathBuf {
        self.thread_dir(normalized_name, thread_id).join("thread.json")
    }

    pub fn thread_lock_path(&self, normalized_name: &str, thread_id: &ThreadId) -> PathBuf {
        self.thread_dir(normalized_name, thread_id).join(".lock")
    }

    pub fn stream_path(&self, normalized_name: &str, thread_id: &ThreadId, member: &str) -> PathBuf {
        self.thread_dir(normalized_name, thread_id).join(format!(".stream-{member}.jsonl"))
    }

    pub fn branch_worktrees_dir(&self, normalized_name: &str) -> PathBuf {
        self.branch_dir(normalized_name).join("worktrees")
    }

    pub fn worktree_dir(&self, normalized_name: &str, ticket: &str) -> PathBuf {
        self.branch_worktrees_dir(normalized_name).join(ticket)
    }

    pub fn branch_sessions_dir(&self, normalized_name: &str) -> PathBuf {
        self.branch_dir(normalized_name).join("sessions")
    }

    pub fn session_path(&self, normalized_name: &str, member: &str) -> PathBuf {
        self.branch_sessions_dir(normalized_name).join(format!("{member}.json"))
    }

    /// Peasant session records. Not enumerated in §6.1's filesystem tree
    /// (which only lists agent `sessions/`); added as an implementation
    /// binding, documented in DESIGN.md.
    pub fn branch_peasants_dir(&self, normalized_name: &str) -> PathBuf {
        self.branch_dir(normalized_name).join("peasants")
    }

    pub fn peasant_session_path(&self, normalized_name: &str, session_name: &str) -> PathBuf {
        self.branch_peasants_dir(normalized_name).join(format!("{session_name}.json"))
    }

    pub fn ticket_path(&self, tickets_dir: &Path, id: &str) -> PathBuf {
        tickets_dir.join(format!("{id}.md"))
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.kd_dir().join("archive")
    }

    pub fn archive_tickets_dir(&self) -> PathBuf {
        self.archive_dir().join("tickets")
    }
}

/// Walk upward from `start` looking for a `.kd` or `.git` directory,
/// returning the first ancestor that has one. Every command resolves the
/// repository root this way rather than relying on any cached/global
/// state (§9 "no global singletons").
pub fn discover_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(".kd").is_dir() || dir.join(".git").exists() {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}
