// SPDX-License-Identifier: MIT

//! Ticket CRUD and graph queries (§4.7).

use crate::branches;
use crate::git;
use crate::paths::KdPaths;
use kingdom_core::{KdError, Ticket, TicketId, TicketStatus, TicketType};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

const MAX_ID_ATTEMPTS: usize = 16;

/// Where a ticket lives: the backlog, or a specific branch's `tickets/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketScope {
    Backlog,
    Branch(String),
}

pub struct TicketStore {
    paths: KdPaths,
}

/// A ticket plus the scope (and file path) it was found in.
pub struct Located {
    pub ticket: Ticket,
    pub scope: TicketScope,
    pub path: PathBuf,
}

impl TicketStore {
    pub fn new(paths: KdPaths) -> Self {
        Self { paths }
    }

    fn scope_dir(&self, scope: &TicketScope) -> PathBuf {
        match scope {
            TicketScope::Backlog => self.paths.backlog_tickets_dir(),
            TicketScope::Branch(name) => self.paths.branch_tickets_dir(name),
        }
    }

    /// Every scope that participates in id-collision checks and default
    /// lookups: backlog + every branch (including done, for the collision
    /// check only) + archive.
    fn all_ticket_files(&self, include_done_branches: bool) -> Result<Vec<(TicketScope, PathBuf)>, KdError> {
        let mut out = Vec::new();
        out.extend(list_md_files(&self.paths.backlog_tickets_dir())?.into_iter().map(|p| (TicketScope::Backlog, p)));
        for branch in branches::list_branches(&self.paths, true)? {
            if !include_done_branches && branch.status.is_done() {
                continue;
            }
            let dir = self.paths.branch_tickets_dir(&branch.normalized_name);
            out.extend(list_md_files(&dir)?.into_iter().map(|p| (TicketScope::Branch(branch.normalized_name.clone()), p)));
        }
        if include_done_branches {
            out.extend(
                list_md_files(&self.paths.archive_tickets_dir())?
                    .into_iter()
                    .map(|p| (TicketScope::Branch("archive".to_string()), p)),
            );
        }
        Ok(out)
    }

    fn exists_anywhere(&self, id: &TicketId) -> Result<bool, KdError> {
        for (_, path) in self.all_ticket_files(true)? {
            if path.file_stem().and_then(|s| s.to_str()) == Some(id.as_str()) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Mint a fresh ticket id, re-rolling on collision against every
    /// existing ticket file in the repo (backlog + every branch + archive).
    pub fn generate_id(&self) -> Result<TicketId, KdError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = TicketId::generate();
            if !self.exists_anywhere(&id)? {
                return Ok(id);
            }
        }
        Err(KdError::Conflict("exhausted id generation attempts without finding a free id".into()))
    }

    pub fn create(
        &self,
        scope: TicketScope,
        title: impl Into<String>,
        ticket_type: TicketType,
        priority: u8,
        deps: Vec<TicketId>,
        now: &str,
    ) -> Result<Ticket, KdError> {
        let id = self.generate_id()?;
        let ticket = Ticket {
            id,
            status: TicketStatus::Open,
            ticket_type,
            priority: priority.clamp(1, 3),
            deps,
            links: Vec::new(),
            assignee: None,
            created_at: now.to_string(),
            title: title.into(),
            body: String::new(),
        };
        self.write_in(&scope, &ticket)?;
        tracing::info!(id = %ticket.id, ?scope, "created ticket");
        Ok(ticket)
    }

    fn write_in(&self, scope: &TicketScope, ticket: &Ticket) -> Result<(), KdError> {
        let path = self.scope_dir(scope).join(format!("{}.md", ticket.id));
        kingdom_core::file_store::write_text(&path, &ticket.to_markdown())?;
        Ok(())
    }

    fn read_path(&self, path: &Path) -> Result<Ticket, KdError> {
        let text =
            kingdom_core::file_store::read_text(path)?.ok_or_else(|| KdError::NotFound(path.display().to_string()))?;
        Ok(Ticket::from_markdown(&text)?)
    }

    /// Resolve a short-id prefix to exactly one ticket among non-done
    /// branches and the backlog. Ambiguous → `Ambiguous`; zero → `NotFound`.
    pub fn find(&self, prefix: &str) -> Result<Located, KdError> {
        self.find_opt(prefix, false)
    }

    pub fn find_opt(&self, prefix: &str, include_done: bool) -> Result<Located, KdError> {
        let candidates: Vec<(TicketScope, PathBuf)> = self
            .all_ticket_files(include_done)?
            .into_iter()
            .filter(|(_, path)| {
                path.file_stem().and_then(|s| s.to_str()).map(|stem| stem.starts_with(prefix)).unwrap_or(false)
            })
            .collect();

        match candidates.len() {
            0 => Err(KdError::NotFound(format!("ticket {prefix}"))),
            1 => {
                let (scope, path) = candidates.into_iter().next().expect("checked len == 1 above");
                let ticket = self.read_path(&path)?;
                Ok(Located { ticket, scope, path })
            }
            _ => {
                let ids: Vec<String> = candidates
                    .iter()
                    .filter_map(|(_, p)| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                    .collect();
                Err(KdError::Ambiguous(format!("{prefix} matches {}", ids.join(", "))))
            }
        }
    }

    fn mutate(&self, prefix: &str, f: impl FnOnce(&mut Ticket)) -> Result<Ticket, KdError> {
        let Located { mut ticket, scope, .. } = self.find(prefix)?;
        f(&mut ticket);
        self.write_in(&scope, &ticket)?;
        Ok(ticket)
    }

    pub fn close(&self, prefix: &str) -> Result<Ticket, KdError> {
        let ticket = self.mutate(prefix, |t| t.status = TicketStatus::Closed)?;
        tracing::info!(id = %ticket.id, "closed ticket");
        Ok(ticket)
    }

    pub fn reopen(&self, prefix: &str) -> Result<Ticket, KdError> {
        self.mutate(prefix, |t| t.status = TicketStatus::Open)
    }

    pub fn start(&self, prefix: &str) -> Result<Ticket, KdError> {
        self.mutate(prefix, |t| t.status = TicketStatus::InProgress)
    }

    pub fn assign(&self, prefix: &str, assignee: &str) -> Result<Ticket, KdError> {
        self.mutate(prefix, |t| t.assignee = Some(assignee.to_string()))
    }

    pub fn unassign(&self, prefix: &str) -> Result<Ticket, KdError> {
        self.mutate(prefix, |t| t.assignee = None)
    }

    /// Append `dep` to `id`'s deps if not already present. Appending must
    /// preserve prior deps — this never overwrites the list (§4.7, §8
    /// invariant 5).
    pub fn add_dep(&self, id_prefix: &str, dep_prefix: &str) -> Result<Ticket, KdError> {
        let dep = self.find(dep_prefix)?.ticket.id;
        self.mutate(id_prefix, |t| {
            if !t.deps.contains(&dep) {
                t.deps.push(dep);
            }
        })
    }

    pub fn remove_dep(&self, id_prefix: &str, dep_prefix: &str) -> Result<Ticket, KdError> {
        let dep = self.find(dep_prefix)?.ticket.id;
        self.mutate(id_prefix, |t| t.deps.retain(|d| *d != dep))
    }

    /// Move a ticket's file into `target_branch`'s `tickets/` directory,
    /// preserving its id. Uses `git mv` when inside a git work tree.
    pub fn move_ticket(&self, id_prefix: &str, target_branch: &str) -> Result<Ticket, KdError> {
        let Located { ticket, path, .. } = self.find(id_prefix)?;
        let target_dir = self.paths.branch_tickets_dir(target_branch);
        std::fs::create_dir_all(&target_dir)?;
        let dst = target_dir.join(format!("{}.md", ticket.id));
        git::mv(self.paths.root(), &path, &dst).map_err(|e| KdError::Io(e.to_string()))?;
        tracing::info!(id = %ticket.id, branch = target_branch, "moved ticket");
        Ok(ticket)
    }

    /// Tickets in `branch` that are open and whose every dep is closed.
    pub fn ready(&self, branch: &str) -> Result<Vec<Ticket>, KdError> {
        let dir = self.paths.branch_tickets_dir(branch);
        let tickets = read_all(&dir)?;
        let closed: HashSet<TicketId> =
            tickets.iter().filter(|t| t.status == TicketStatus::Closed).map(|t| t.id).collect();
        Ok(tickets.into_iter().filter(|t| t.is_ready(&closed)).collect())
    }

    /// Detect cycles in the dep graph restricted to open tickets in
    /// `branch`. A cycle that only passes through closed tickets is
    /// permitted (§3), so closed tickets are excluded from the graph.
    pub fn cycle_check(&self, branch: &str) -> Result<Vec<Vec<TicketId>>, KdError> {
        let dir = self.paths.branch_tickets_dir(branch);
        let tickets = read_all(&dir)?;
        let open: HashMap<TicketId, Vec<TicketId>> = tickets
            .iter()
            .filter(|t| t.status != TicketStatus::Closed)
            .map(|t| (t.id, t.deps.iter().filter(|d| tickets.iter().any(|o| o.id == **d && o.status != TicketStatus::Closed)).copied().collect()))
            .collect();

        let mut cycles = Vec::new();
        let mut visited: HashSet<TicketId> = HashSet::new();
        for &start in open.keys() {
            if visited.contains(&start) {
                continue;
            }
            let mut stack = Vec::new();
            let mut on_stack: HashSet<TicketId> = HashSet::new();
            if let Some(cycle) = dfs(start, &open, &mut stack, &mut on_stack, &mut visited) {
                cycles.push(cycle);
            }
        }
        Ok(cycles)
    }
}

const LEGACY_ID_PREFIX: &str = "kin-";

/// A pending legacy-id rewrite: old `kin-xxxx` file path, its replacement
/// bare-hex path, and the literal id strings to substitute throughout the
/// file's text (frontmatter `id:` and any `deps:` entries referencing it).
#[derive(Debug, Clone)]
pub struct MigrationStep {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub old_id: String,
    pub new_id: String,
}

/// The full set of rewrites a migration run would perform, computed without
/// touching the filesystem (§4.7 Migration: dry-run by default).
#[derive(Debug, Default)]
pub struct MigrationPlan {
    pub steps: Vec<MigrationStep>,
}

impl TicketStore {
    fn is_legacy_hex(hex: &str) -> bool {
        hex.len() == 4 && hex.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
    }

    /// Scan every ticket file (backlog, every branch including done, and
    /// archive) for `kin-xxxx`-style legacy ids and compute the rewrites
    /// needed to migrate them to bare 4-hex ids. Aborts with `Conflict`
    /// before returning a plan if any rewrite would collide with an id
    /// already in use — the caller never sees a partially-safe plan.
    pub fn plan_migration(&self) -> Result<MigrationPlan, KdError> {
        let mut steps = Vec::new();
        let mut target_ids: HashSet<String> = HashSet::new();
        for (_, path) in self.all_ticket_files(true)? {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else { continue };
            let Some(hex) = stem.strip_prefix(LEGACY_ID_PREFIX) else { continue };
            if !Self::is_legacy_hex(hex) {
                continue;
            }
            let new_path = path.with_file_name(format!("{hex}.md"));
            steps.push(MigrationStep {
                old_path: path,
                new_path,
                old_id: format!("{LEGACY_ID_PREFIX}{hex}"),
                new_id: hex.to_string(),
            });
            target_ids.insert(hex.to_string());
        }

        for step in &steps {
            if step.new_path.exists() {
                return Err(KdError::Conflict(format!(
                    "migration target {} already exists",
                    step.new_path.display()
                )));
            }
        }
        let mut seen = HashSet::new();
        for id in &target_ids {
            if !seen.insert(id.clone()) {
                return Err(KdError::Conflict(format!("migration collision on id {id}")));
            }
        }

        Ok(MigrationPlan { steps })
    }

    /// Apply a previously computed plan: rewrite every ticket file's text
    /// (substituting the old id for the new wherever it appears, covering
    /// both the frontmatter `id:` line and any `deps:` references) then
    /// `git mv` it to its bare-hex name. Running this twice is a no-op the
    /// second time, since `plan_migration` finds nothing left to rewrite.
    pub fn apply_migration(&self, plan: &MigrationPlan) -> Result<(), KdError> {
        for step in &plan.steps {
            let text = kingdom_core::file_store::read_text(&step.old_path)?
                .ok_or_else(|| KdError::NotFound(step.old_path.display().to_string()))?;
            let rewritten = text.replace(&step.old_id, &step.new_id);
            kingdom_core::file_store::write_text(&step.old_path, &rewritten)?;
            git::mv(self.paths.root(), &step.old_path, &step.new_path).map_err(|e| KdError::Io(e.to_string()))?;
            tracing::info!(old_id = %step.old_id, new_id = %step.new_id, "migrated legacy ticket id");
        }
        Ok(())
    }
}

fn dfs(
    node: TicketId,
    graph: &HashMap<TicketId, Vec<TicketId>>,
    stack: &mut Vec<TicketId>,
    on_stack: &mut HashSet<TicketId>,
    visited: &mut HashSet<TicketId>,
) -> Option<Vec<TicketId>> {
    stack.push(node);
    on_stack.insert(node);
    if let Some(deps) = graph.get(&node) {
        for &dep in deps {
            if on_stack.contains(&dep) {
                let start = stack.iter().position(|n| *n == dep).unwrap_or(0);
                return Some(stack[start..].to_vec());
            }
            if !visited.contains(&dep) {
                if let Some(cycle) = dfs(dep, graph, stack, on_stack, visited) {
                    return Some(cycle);
                }
            }
        }
    }
    stack.pop();
    on_stack.remove(&node);
    visited.insert(node);
    None
}

fn list_md_files(dir: &Path) -> Result<Vec<PathBuf>, KdError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
        .collect();
    files.sort();
    Ok(files)
}

pub(crate) fn read_all(dir: &Path) -> Result<Vec<Ticket>, KdError> {
    list_md_files(dir)?
        .into_iter()
        .map(|path| {
            let text = kingdom_core::file_store::read_text(&path)?
                .ok_or_else(|| KdError::NotFound(path.display().to_string()))?;
            Ok(Ticket::from_markdown(&text)?)
        })
        .collect()
}

#[cfg(test)]
#[path = "ticket_store_tests.rs"]
mod tests;
