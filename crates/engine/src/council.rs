// SPDX-License-Identifier: MIT

//! The Council engine (§4.6): fan out a prompt to N agent members in
//! parallel, stream their partial output, retry on transient failure, and
//! persist final responses as sequenced thread messages.
//!
//! Constructed fresh per command invocation from a [`KdPaths`] and a list of
//! configured [`Member`]s — no process-wide state, per §9.

use kingdom_adapters::{query, AgentAdapter};
use kingdom_core::thread::{empty_sentinel, error_sentinel};
use kingdom_core::{KdError, ThreadId, ThreadKind, ThreadMessage};
use kingdom_storage::{sessions, KdPaths, ThreadStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// One configured council member: a name (matched against `@mentions` and
/// `to` targets) plus the adapter that drives its backend CLI.
pub struct Member {
    pub name: String,
    pub adapter: Arc<dyn AgentAdapter>,
    pub timeout: Duration,
}

/// Sentinel accepted wherever the spec allows the literal string `"all"` as
/// a `to` target or an `@mention` (§4.6 step 1).
pub const ALL: &str = "all";

pub struct Council {
    paths: KdPaths,
    branch: String,
    members: Vec<Member>,
    max_retries: u32,
    auto_commit: bool,
}

/// What `ask` actually did, for the CLI layer to report.
#[derive(Debug)]
pub struct AskOutcome {
    pub thread_id: ThreadId,
    pub responded: Vec<String>,
    pub errored: Vec<String>,
}

/// What `watch` observed after tailing a thread to completion or timeout.
#[derive(Debug, Default)]
pub struct WatchOutcome {
    pub completed: Vec<String>,
    pub pending: Vec<String>,
    pub previews: HashMap<String, String>,
}

impl Council {
    pub fn new(paths: KdPaths, branch: impl Into<String>, members: Vec<Member>, max_retries: u32, auto_commit: bool) -> Self {
        Self { paths, branch: branch.into(), members, max_retries, auto_commit }
    }

    fn thread_store(&self) -> ThreadStore {
        ThreadStore::new(self.paths.clone())
    }

    fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Resolve the target member names for `ask` (§4.6 step 1): `@mentions`
    /// in the prompt take priority over the `to` parameter. `@all` and a
    /// bare `to: "all"` both expand to every configured member. An unknown
    /// name — whether mentioned or passed explicitly — fails loudly before
    /// any subprocess is spawned.
    pub fn resolve_targets(&self, prompt: &str, to: Option<&str>) -> Result<Vec<String>, KdError> {
        let mentions = crate::mentions::extract_mentions(prompt);
        if !mentions.is_empty() {
            return self.validate_targets(mentions);
        }
        match to {
            None => Ok(self.members.iter().map(|m| m.name.clone()).collect()),
            Some(t) if t == ALL => Ok(self.members.iter().map(|m| m.name.clone()).collect()),
            Some(t) => self.validate_targets(vec![t.to_string()]),
        }
    }

    fn validate_targets(&self, names: Vec<String>) -> Result<Vec<String>, KdError> {
        let mut targets = Vec::new();
        for name in names {
            if name == ALL {
                for m in &self.members {
                    if !targets.contains(&m.name) {
                        targets.push(m.name.clone());
                    }
                }
                continue;
            }
            if self.member(&name).is_none() {
                return Err(KdError::NotFound(format!("council member {name:?}")));
            }
            if !targets.contains(&name) {
                targets.push(name);
            }
        }
        Ok(targets)
    }

    /// Find the most recently created `council-*` thread for this branch, if
    /// any — used by `ask` to resume "the current thread" when neither an
    /// explicit `thread_id` nor `new_thread` is given.
    fn latest_council_thread(&self) -> Result<Option<ThreadId>, KdError> {
        let dir = self.paths.branch_threads_dir(&self.branch);
        if !dir.exists() {
            return Ok(None);
        }
        let store = self.thread_store();
        let mut best: Option<(String, ThreadId)> = None;
        for entry in std::fs::read_dir(&dir)?.filter_map(|e| e.ok()) {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else { continue };
            if !name.starts_with("council-") {
                continue;
            }
            let tid = ThreadId::new(name);
            let Ok(meta) = store.meta(&self.branch, &tid) else { continue };
            if best.as_ref().map(|(created, _)| meta.created_at > *created).unwrap_or(true) {
                best = Some((meta.created_at, tid));
            }
        }
        Ok(best.map(|(_, tid)| tid))
    }

    /// §4.6 `ask`: resolve targets and thread, append the king message, fan
    /// the prompt out to every target member in parallel, and append each
    /// member's response as it lands.
    pub async fn ask(
        &self,
        prompt: &str,
        to: Option<&str>,
        thread_id: Option<ThreadId>,
        new_thread: bool,
        now: &str,
    ) -> Result<AskOutcome, KdError> {
        let targets = self.resolve_targets(prompt, to)?;
        tracing::info!(branch = %self.branch, targets = ?targets, "council ask");
        let store = self.thread_store();

        let thread_id = match thread_id {
            Some(tid) => {
                store.meta(&self.branch, &tid)?;
                tid
            }
            None => {
                if !new_thread {
                    if let Some(existing) = self.latest_council_thread()? {
                        existing
                    } else {
                        store.create_thread(&self.branch, targets.clone(), ThreadKind::Council, now)?
                    }
                } else {
                    store.create_thread(&self.branch, targets.clone(), ThreadKind::Council, now)?
                }
            }
        };

        let to_field = if to == Some(ALL) || (to.is_none() && targets.len() == self.members.len()) {
            ALL.to_string()
        } else {
            targets.join(",")
        };
        store.append(&self.branch, &thread_id, "king", &to_field, prompt.to_string(), None, now)?;

        let mut handles = Vec::new();
        for name in &targets {
            let member = self.member(name).expect("validated above").adapter.clone();
            let member_name = name.clone();
            let paths = self.paths.clone();
            let branch = self.branch.clone();
            let thread_id = thread_id.clone();
            let prompt = prompt.to_string();
            let timeout = self.member(name).expect("validated above").timeout;
            let max_retries = self.max_retries;
            let now = now.to_string();
            handles.push(tokio::spawn(async move {
                query_to_thread(&paths, &branch, &thread_id, &member_name, &*member, &prompt, timeout, max_retries, &now)
                    .await
            }));
        }

        let mut responded = Vec::new();
        let mut errored = Vec::new();
        for (name, handle) in targets.iter().zip(handles) {
            match handle.await {
                Ok(Ok(is_error)) => {
                    if is_error {
                        errored.push(name.clone());
                    } else {
                        responded.push(name.clone());
                    }
                }
                _ => errored.push(name.clone()),
            }
        }

        if self.auto_commit {
            let pathspec = format!(".kd/branches/{}/threads/{}", self.branch, thread_id);
            let message = format!("council: {}", truncate_60(prompt));
            let _ = kingdom_storage::git::add_and_commit(self.paths.root(), &pathspec, &message);
        }

        if !errored.is_empty() {
            tracing::warn!(%thread_id, errored = ?errored, "council members errored");
        }
        Ok(AskOutcome { thread_id, responded, errored })
    }

    /// §4.6 `retry`: reissue the most recent king message's prompt to every
    /// expected responder whose latest response is absent or an error
    /// sentinel. Expected responders come from that king message's `to`
    /// field, not from thread metadata.
    pub async fn retry(&self, thread_id: &ThreadId, now: &str) -> Result<AskOutcome, KdError> {
        let store = self.thread_store();
        let king = store
            .latest_king_message(&self.branch, thread_id)?
            .ok_or_else(|| KdError::NotFound(format!("no king message in thread {thread_id}")))?;
        let expected = self.validate_targets(split_to_field(&king.to))?;
        tracing::info!(%thread_id, expected = ?expected, "council retry");

        let messages = store.list(&self.branch, thread_id)?;
        let mut needs_retry = Vec::new();
        for name in &expected {
            let latest = messages.iter().filter(|m| m.from == *name && m.sequence > king.sequence).last();
            match latest {
                None => needs_retry.push(name.clone()),
                Some(m) if m.is_error_sentinel() => needs_retry.push(name.clone()),
                Some(_) => {}
            }
        }

        let mut handles = Vec::new();
        for name in &needs_retry {
            let member = self.member(name).expect("validated above").adapter.clone();
            let member_name = name.clone();
            let paths = self.paths.clone();
            let branch = self.branch.clone();
            let thread_id = thread_id.clone();
            let prompt = king.body.clone();
            let timeout = self.member(name).expect("validated above").timeout;
            let max_retries = self.max_retries;
            let now = now.to_string();
            handles.push(tokio::spawn(async move {
                query_to_thread(&paths, &branch, &thread_id, &member_name, &*member, &prompt, timeout, max_retries, &now)
                    .await
            }));
        }

        let mut responded = Vec::new();
        let mut errored = Vec::new();
        for (name, handle) in needs_retry.iter().zip(handles) {
            match handle.await {
                Ok(Ok(false)) => responded.push(name.clone()),
                _ => errored.push(name.clone()),
            }
        }

        Ok(AskOutcome { thread_id: thread_id.clone(), responded, errored })
    }

    /// §4.6 `reset`: delete session files for the given members, or every
    /// configured member if `None`. Does not touch threads.
    pub fn reset(&self, members: Option<&[String]>) -> Result<(), KdError> {
        let names: Vec<String> = match members {
            Some(m) => m.to_vec(),
            None => self.members.iter().map(|m| m.name.clone()).collect(),
        };
        for name in names {
            sessions::delete_session(&self.paths, &self.branch, &name)?;
        }
        Ok(())
    }

    /// §4.6 `watch`: poll until every expected member has posted a response
    /// to the most recent king message, or `timeout` elapses. While
    /// waiting, tail each member's stream file from a tracked byte offset;
    /// if the file shrinks below that offset (a retry truncated it), the
    /// offset resets to zero rather than seeking past EOF.
    pub async fn watch(&self, thread_id: &ThreadId, expected: &[String], timeout: Duration) -> Result<WatchOutcome, KdError> {
        let store = self.thread_store();
        let king = store
            .latest_king_message(&self.branch, thread_id)?
            .ok_or_else(|| KdError::NotFound(format!("no king message in thread {thread_id}")))?;

        let mut offsets: HashMap<String, u64> = expected.iter().map(|n| (n.clone(), 0)).collect();
        let mut previews: HashMap<String, String> = HashMap::new();
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let messages = store.list(&self.branch, thread_id)?;
            let completed: Vec<String> = expected
                .iter()
                .filter(|name| messages.iter().any(|m| m.from == **name && m.sequence > king.sequence))
                .cloned()
                .collect();
            if completed.len() == expected.len() {
                let pending = Vec::new();
                return Ok(WatchOutcome { completed, pending, previews });
            }

            for name in expected {
                if completed.contains(name) {
                    continue;
                }
                let path = store.stream_path(&self.branch, thread_id, name);
                if let Ok(text) = std::fs::read_to_string(&path) {
                    let len = text.len() as u64;
                    let offset = offsets.entry(name.clone()).or_insert(0);
                    if len < *offset {
                        *offset = 0;
                    }
                    let tail = &text[(*offset as usize).min(text.len())..];
                    if !tail.is_empty() {
                        previews.entry(name.clone()).or_default().push_str(tail);
                    }
                    *offset = len;
                }
            }

            if tokio::time::Instant::now() >= deadline {
                let pending: Vec<String> = expected.iter().filter(|n| !completed.contains(n)).cloned().collect();
                return Ok(WatchOutcome { completed, pending, previews });
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    }
}

fn split_to_field(to: &str) -> Vec<String> {
    if to == ALL {
        vec![ALL.to_string()]
    } else {
        to.split(',').map(str::to_string).collect()
    }
}

fn truncate_60(s: &str) -> String {
    if s.chars().count() <= 60 {
        s.to_string()
    } else {
        s.chars().take(60).collect()
    }
}

/// Run one member's query against `thread_id` and append the result —
/// success as the text body, failure as the canonical error sentinel
/// (§6.5) — then delete the stream file and persist any new session id
/// (§3 `AgentSession`: replaced, never appended). Returns whether the
/// appended message was an error.
#[allow(clippy::too_many_arguments)]
async fn query_to_thread(
    paths: &KdPaths,
    branch: &str,
    thread_id: &ThreadId,
    member_name: &str,
    adapter: &dyn AgentAdapter,
    prompt: &str,
    timeout: Duration,
    max_retries: u32,
    now: &str,
) -> Result<bool, KdError> {
    let store = ThreadStore::new(paths.clone());
    let stream_path = store.stream_path(branch, thread_id, member_name);
    let existing_session = sessions::read_session(paths, branch, member_name)?.and_then(|s| s.session_id);

    let response = query::query(
        adapter,
        prompt,
        timeout,
        existing_session.map(|s| s.as_str().to_string()),
        Some(&stream_path),
        max_retries,
    )
    .await;

    let (body, is_error) = match &response.error {
        Some(err) => {
            let (kind, detail) = err.split_once(':').map(|(k, d)| (k, d.trim())).unwrap_or((err.as_str(), ""));
            tracing::warn!(member = member_name, %thread_id, error = err.as_str(), "member query failed");
            (error_sentinel(kind, detail), true)
        }
        None if response.text.trim().is_empty() => (empty_sentinel(member_name), true),
        None => (response.text.clone(), false),
    };

    store.append(branch, thread_id, member_name, "king", body, None, now)?;

    if let Some(session_id) = response.session_id {
        let mut session = sessions::read_session(paths, branch, member_name)?
            .unwrap_or_else(|| kingdom_core::AgentSession::new(member_name, now));
        session.set_session_id(kingdom_core::SessionId::new(session_id), now);
        sessions::write_session(paths, branch, &session)?;
    }

    Ok(is_error)
}

#[cfg(test)]
#[path = "council_tests.rs"]
mod tests;
