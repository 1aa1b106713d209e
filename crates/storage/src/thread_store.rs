// SPDX-License-Identifier: MIT

//! Append-only thread message log (§4.5, §6.4).
//!
//! Every thread directory holds a `.lock` file used only as an fs2 advisory
//! lock scope: `next_sequence` and `append` both acquire it for the
//! duration of their read-scan-write, so concurrent appends from parallel
//! council member tasks serialize sequence assignment without serializing
//! anything else.

use crate::paths::KdPaths;
use fs2::FileExt;
use kingdom_core::{KdError, ThreadId, ThreadKind, ThreadMessage, ThreadMeta};
use std::fs::File;
use std::path::Path;

pub struct ThreadStore {
    paths: KdPaths,
}

impl ThreadStore {
    pub fn new(paths: KdPaths) -> Self {
        Self { paths }
    }

    fn with_thread_lock<T>(
        &self,
        branch: &str,
        thread_id: &ThreadId,
        f: impl FnOnce() -> Result<T, KdError>,
    ) -> Result<T, KdError> {
        let dir = self.paths.thread_dir(branch, thread_id);
        std::fs::create_dir_all(&dir)?;
        let lock_path = self.paths.thread_lock_path(branch, thread_id);
        let lock_file = File::create(&lock_path)?;
        lock_file.lock_exclusive().map_err(|e| KdError::Io(format!("locking {}: {e}", lock_path.display())))?;
        let result = f();
        let _ = FileExt::unlock(&lock_file);
        result
    }

    pub fn create_thread(
        &self,
        branch: &str,
        members: Vec<String>,
        kind: ThreadKind,
        now: &str,
    ) -> Result<ThreadId, KdError> {
        let thread_id = match kind {
            ThreadKind::Council => ThreadId::council(kingdom_core::TicketId::generate()),
            ThreadKind::Work => return Err(KdError::InvalidConfig("work threads must use create_work_thread".into())),
        };
        self.write_meta(branch, &thread_id, &ThreadMeta { members, kind, created_at: now.to_string() })?;
        Ok(thread_id)
    }

    /// Create (or resume, if already present) the work thread for a ticket.
    pub fn create_or_resume_work_thread(
        &self,
        branch: &str,
        ticket: &kingdom_core::TicketId,
        now: &str,
    ) -> Result<ThreadId, KdError> {
        let thread_id = ThreadId::work(ticket);
        if self.meta(branch, &thread_id).is_err() {
            self.write_meta(
                branch,
                &thread_id,
                &ThreadMeta { members: vec!["assistant".to_string()], kind: ThreadKind::Work, created_at: now.to_string() },
            )?;
        }
        Ok(thread_id)
    }

    fn write_meta(&self, branch: &str, thread_id: &ThreadId, meta: &ThreadMeta) -> Result<(), KdError> {
        let path = self.paths.thread_meta_path(branch, thread_id);
        kingdom_core::file_store::write_json(&path, meta)?;
        Ok(())
    }

    pub fn meta(&self, branch: &str, thread_id: &ThreadId) -> Result<ThreadMeta, KdError> {
        let path = self.paths.thread_meta_path(branch, thread_id);
        kingdom_core::file_store::read_json(&path)?.ok_or_else(|| KdError::NotFound(format!("thread {thread_id}")))
    }

    fn message_files(dir: &Path) -> Result<Vec<std::path::PathBuf>, KdError> {
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut files: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.ends_with(".md") && n.len() >= 5 && n.as_bytes()[..4].iter().all(u8::is_ascii_digit))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// The next sequence number for a thread: `max(existing) + 1`, or `1`
    /// if none exist. Callers needing a consistent read-then-write must
    /// call this from inside [`Self::with_thread_lock`].
    pub fn next_sequence(&self, branch: &str, thread_id: &ThreadId) -> Result<u32, KdError> {
        let dir = self.paths.thread_dir(branch, thread_id);
        let files = Self::message_files(&dir)?;
        let max = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .filter_map(|n| n.get(0..4).and_then(|s| s.parse::<u32>().ok()))
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    /// Append a message. If `sequence` is `None`, resolves the next dense
    /// sequence number under the thread lock.
    pub fn append(
        &self,
        branch: &str,
        thread_id: &ThreadId,
        from: &str,
        to: &str,
        body: String,
        sequence: Option<u32>,
        now: &str,
    ) -> Result<ThreadMessage, KdError> {
        self.with_thread_lock(branch, thread_id, || {
            let sequence = match sequence {
                Some(s) => s,
                None => self.next_sequence(branch, thread_id)?,
            };
            let message = ThreadMessage {
                sequence,
                from: from.to_string(),
                to: to.to_string(),
                timestamp: now.to_string(),
                error: kingdom_core::thread::error_kind(&body).is_some(),
                completed: false,
                body,
            };
            let path = self.paths.thread_dir(branch, thread_id).join(message.filename());
            let text = kingdom_core::parsing::emit(&message.to_document());
            kingdom_core::file_store::write_text(&path, &text)?;
            tracing::debug!(%thread_id, from, to, sequence, "appended thread message");
            Ok(message)
        })
    }

    /// Ordered messages, strictly by filename numeric prefix.
    pub fn list(&self, branch: &str, thread_id: &ThreadId) -> Result<Vec<ThreadMessage>, KdError> {
        let dir = self.paths.thread_dir(branch, thread_id);
        let files = Self::message_files(&dir)?;
        let mut messages = Vec::with_capacity(files.len());
        for path in files {
            let text = kingdom_core::file_store::read_text(&path)?
                .ok_or_else(|| KdError::NotFound(path.display().to_string()))?;
            let doc = kingdom_core::parsing::parse(&text)?;
            messages.push(ThreadMessage::from_document(&doc)?);
        }
        messages.sort_by_key(|m| m.sequence);
        Ok(messages)
    }

    pub fn latest_king_message(&self, branch: &str, thread_id: &ThreadId) -> Result<Option<ThreadMessage>, KdError> {
        Ok(self.list(branch, thread_id)?.into_iter().filter(|m| m.from == "king").last())
    }

    pub fn delete_stream(&self, branch: &str, thread_id: &ThreadId, member: &str) -> Result<(), KdError> {
        let path = self.paths.stream_path(branch, thread_id, member);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KdError::Io(e.to_string())),
        }
    }

    pub fn stream_path(&self, branch: &str, thread_id: &ThreadId, member: &str) -> std::path::PathBuf {
        self.paths.stream_path(branch, thread_id, member)
    }
}

#[cfg(test)]
#[path = "thread_store_tests.rs"]
mod tests;
