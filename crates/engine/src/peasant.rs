// SPDX-License-Identifier: MIT

//! The Peasant supervisor (§4.8): spawns a detached worker process running
//! the [`crate::agent_loop::AgentLoop`] harness in a per-ticket git
//! worktree (or the base directory, in hand mode), tracks liveness via the
//! recorded pid, and enforces the one-hand-at-a-time invariant.

use kingdom_core::{KdError, PeasantMode, PeasantSession, TicketId, TicketStatus};
use kingdom_storage::ticket_store::TicketScope;
use kingdom_storage::{git, peasant_sessions, KdPaths, ThreadStore, TicketStore};
use std::path::PathBuf;
use std::process::Stdio;

pub struct Peasant {
    paths: KdPaths,
    branch: String,
}

/// A recorded session's liveness, reported by [`Peasant::status`].
#[derive(Debug)]
pub struct SessionStatus {
    pub session: PeasantSession,
    pub alive: bool,
}

impl Peasant {
    pub fn new(paths: KdPaths, branch: impl Into<String>) -> Self {
        Self { paths, branch: branch.into() }
    }

    fn ticket_store(&self) -> TicketStore {
        TicketStore::new(self.paths.clone())
    }

    fn thread_store(&self) -> ThreadStore {
        ThreadStore::new(self.paths.clone())
    }

    /// §4.8 `start`. `auto_pull` should be `true` only when called from
    /// `start`/`work` — never from read-only subcommands (`logs`, `read`,
    /// `stop`, `clean`, `sync`), per the spec's explicit carve-out.
    pub fn start(&self, ticket_prefix: &str, mode: PeasantMode, auto_pull: bool, now: &str) -> Result<PeasantSession, KdError> {
        let store = self.ticket_store();
        let located = store.find(ticket_prefix)?;
        if located.ticket.status == TicketStatus::Closed {
            return Err(KdError::Conflict(format!("ticket {} is closed", located.ticket.id)));
        }

        let ticket = if auto_pull && located.scope == TicketScope::Backlog {
            store.move_ticket(located.ticket.id.as_str(), &self.branch)?
        } else {
            located.ticket
        };

        if mode == PeasantMode::Hand {
            if let Some(existing) = peasant_sessions::find_active_hand_session(&self.paths, &self.branch)? {
                return Err(KdError::Conflict(format!(
                    "hand session {} is already active in this branch",
                    existing.name
                )));
            }
        }

        let worktree_path = match mode {
            PeasantMode::Worktree => {
                let wt = self.paths.worktree_dir(&self.branch, ticket.id.as_str());
                std::fs::create_dir_all(wt.parent().unwrap_or(&wt))?;
                git::worktree_add(self.paths.root(), &wt, &format!("kd/{}", ticket.id))
                    .map_err(|e| KdError::Io(e.to_string()))?;
                wt
            }
            PeasantMode::Hand => self.paths.root().to_path_buf(),
        };

        let thread_store = self.thread_store();
        let thread_id = thread_store.create_or_resume_work_thread(&self.branch, &ticket.id, now)?;
        if thread_store.list(&self.branch, &thread_id)?.is_empty() {
            let seed = format!("# {}\n\n{}", ticket.title, ticket.body);
            thread_store.append(&self.branch, &thread_id, "king", "assistant", seed, None, now)?;
        }

        let session_name = PeasantSession::session_name(&ticket.id, mode);
        let pid = spawn_detached_worker(&worktree_path, &ticket.id, mode)?;

        let session = PeasantSession {
            name: session_name,
            ticket_id: ticket.id,
            agent: "codex".to_string(),
            mode,
            worktree_path,
            thread_id,
            pid,
            started_at: now.to_string(),
        };
        peasant_sessions::write(&self.paths, &self.branch, &session)?;
        tracing::info!(session = %session.name, ticket = %session.ticket_id, pid = session.pid, ?mode, "peasant started");
        Ok(session)
    }

    /// Probe liveness (signal-0 style) for every recorded session.
    pub fn status(&self) -> Result<Vec<SessionStatus>, KdError> {
        peasant_sessions::list(&self.paths, &self.branch)?
            .into_iter()
            .map(|session| {
                let alive = crate::liveness::is_alive(session.pid);
                Ok(SessionStatus { session, alive })
            })
            .collect()
    }

    fn find_session(&self, session_name: &str) -> Result<PeasantSession, KdError> {
        peasant_sessions::read(&self.paths, &self.branch, session_name)?
            .ok_or_else(|| KdError::NotFound(format!("peasant session {session_name}")))
    }

    /// Terminate a session's worker process and clear its record.
    pub fn stop(&self, session_name: &str) -> Result<(), KdError> {
        let session = self.find_session(session_name)?;
        terminate(session.pid);
        tracing::info!(session = session_name, pid = session.pid, "peasant session stopped");
        peasant_sessions::delete(&self.paths, &self.branch, session_name)
    }

    /// Remove a session's record (and worktree, in worktree mode) without
    /// requiring the worker to still be alive.
    pub fn clean(&self, session_name: &str) -> Result<(), KdError> {
        let session = self.find_session(session_name)?;
        if session.mode == PeasantMode::Worktree {
            let _ = git::worktree_remove(self.paths.root(), &session.worktree_path);
        }
        peasant_sessions::delete(&self.paths, &self.branch, session_name)
    }

    /// Pull upstream changes into a worktree-mode session's checkout.
    pub fn sync(&self, session_name: &str) -> Result<(), KdError> {
        let session = self.find_session(session_name)?;
        if session.mode != PeasantMode::Worktree {
            return Ok(());
        }
        let output = std::process::Command::new("git")
            .current_dir(&session.worktree_path)
            .args(["pull", "--ff-only"])
            .output()
            .map_err(|e| KdError::Io(e.to_string()))?;
        if !output.status.success() {
            return Err(KdError::NonZeroExit(String::from_utf8_lossy(&output.stderr).to_string()));
        }
        Ok(())
    }

    /// Append a king-to-session message to a ticket's work thread.
    pub fn msg(&self, session_name: &str, body: &str, now: &str) -> Result<(), KdError> {
        let session = self.find_session(session_name)?;
        let thread_store = self.thread_store();
        thread_store.append(&self.branch, &session.thread_id, "king", &session_name.to_string(), body.to_string(), None, now)?;
        Ok(())
    }

    /// `peasant review --reject`: relaunch the harness on the stored
    /// worktree path. Fails loudly rather than falling back to the base
    /// directory if that path has disappeared (§4.8).
    pub fn review_reject(&self, session_name: &str, now: &str) -> Result<PeasantSession, KdError> {
        let mut session = self.find_session(session_name)?;
        if session.mode == PeasantMode::Worktree && !session.worktree_path.exists() {
            return Err(KdError::NotFound(format!(
                "worktree {} no longer exists",
                session.worktree_path.display()
            )));
        }
        let pid = spawn_detached_worker(&session.worktree_path, &session.ticket_id, session.mode)?;
        session.pid = pid;
        session.started_at = now.to_string();
        peasant_sessions::write(&self.paths, &self.branch, &session)?;
        tracing::info!(session = %session.name, pid = session.pid, "peasant session relaunched after review reject");
        Ok(session)
    }
}

/// Spawn the harness as a detached background process: the current
/// binary re-invoked with `work <ticket>` inside `cwd`, stdio nulled so it
/// is not tied to the parent's controlling terminal (§4.8, §4.3). The join
/// handle is dropped rather than awaited — that is the detachment — but a
/// background reaper would be wired in by the CLI's `tokio::Runtime` to
/// avoid zombie processes; not needed for a process that immediately forks
/// and returns here.
fn spawn_detached_worker(cwd: &PathBuf, ticket: &TicketId, _mode: PeasantMode) -> Result<u32, KdError> {
    let exe = std::env::current_exe().map_err(|e| KdError::Io(e.to_string()))?;
    let child = std::process::Command::new(exe)
        .current_dir(cwd)
        .args(["work", ticket.as_str()])
        .envs(kingdom_adapters::agent::subprocess_env())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| KdError::Io(e.to_string()))?;
    Ok(child.id())
}

fn terminate(pid: u32) {
    #[cfg(unix)]
    {
        let _ = std::process::Command::new("kill").arg(pid.to_string()).status();
    }
    #[cfg(not(unix))]
    {
        let _ = pid;
    }
}

#[cfg(test)]
#[path = "peasant_tests.rs"]
mod tests;
