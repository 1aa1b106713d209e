// SPDX-License-Identifier: MIT

//! Minimal git plumbing shared by [`crate::ticket_store`] (history-preserving
//! moves) and [`crate::branch_lifecycle`] (worktree management). Each
//! invocation is a single blocking `git` subprocess, serialized by the
//! single-process nature of the CLI command that calls it (§5).

use std::path::Path;
use std::process::Command;

pub fn is_git_repo(root: &Path) -> bool {
    root.join(".git").exists()
}

fn run(root: &Path, args: &[&str]) -> std::io::Result<std::process::Output> {
    Command::new("git").current_dir(root).args(args).output()
}

/// Move `src` to `dst` using `git mv` if `root` is a git work tree and the
/// `git` binary is available; otherwise falls back to a plain filesystem
/// rename. Returns which strategy was used, for logging.
pub fn mv(root: &Path, src: &Path, dst: &Path) -> std::io::Result<bool> {
    if is_git_repo(root) {
        if let Ok(output) = run(root, &["mv", &src.to_string_lossy(), &dst.to_string_lossy()]) {
            if output.status.success() {
                return Ok(true);
            }
        }
    }
    std::fs::rename(src, dst)?;
    Ok(false)
}

pub fn worktree_add(root: &Path, worktree_path: &Path, branch_name: &str) -> std::io::Result<std::process::Output> {
    run(
        root,
        &["worktree", "add", "-B", branch_name, &worktree_path.to_string_lossy()],
    )
}

pub fn worktree_remove(root: &Path, worktree_path: &Path) -> std::io::Result<std::process::Output> {
    run(root, &["worktree", "remove", "--force", &worktree_path.to_string_lossy()])
}

/// The name of the currently checked-out branch, or `None` if `root` is not
/// a git work tree or is in a detached-HEAD state. Branches correspond 1:1
/// with git branch names (§3 `Branch`), so CLI commands that default to
/// "the current branch" resolve it this way rather than tracking their own
/// pointer.
pub fn current_branch(root: &Path) -> Option<String> {
    let output = run(root, &["rev-parse", "--abbrev-ref", "HEAD"]).ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8(output.stdout).ok()?.trim().to_string();
    if name.is_empty() || name == "HEAD" {
        None
    } else {
        Some(name)
    }
}

pub fn add_and_commit(root: &Path, pathspec: &str, message: &str) -> std::io::Result<bool> {
    let add = run(root, &["add", pathspec])?;
    if !add.status.success() {
        return Ok(false);
    }
    let diff = run(root, &["diff", "--cached", "--quiet", "--", pathspec])?;
    if diff.status.success() {
        // Nothing staged — no diffs to commit.
        return Ok(false);
    }
    let commit = run(root, &["commit", "-m", message, "--", pathspec])?;
    Ok(commit.status.success())
}
