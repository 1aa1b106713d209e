// SPDX-License-Identifier: MIT

//! Shared fixture for CLI specs: a throwaway git repository plus a thin
//! wrapper over `assert_cmd` with spec-flavored assertion names.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Project {
    dir: TempDir,
}

impl Project {
    /// A bare temp directory with no `.git` and no `.kd` yet.
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git_init(&self) {
        self.git(&["init", "-q"]);
        self.git(&["config", "user.email", "king@example.test"]);
        self.git(&["config", "user.name", "King"]);
        self.file("README.md", "# scratch\n");
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", "initial"]);
    }

    /// Check out a new branch matching `name` so commands that resolve
    /// "the current branch" from git (§4.10, `Context::branch`) see it.
    pub fn checkout(&self, name: &str) {
        self.git(&["checkout", "-q", "-b", name]);
    }

    fn git(&self, args: &[&str]) {
        let status = std::process::Command::new("git")
            .current_dir(self.path())
            .args(args)
            .status()
            .expect("git invocation");
        assert!(status.success(), "git {args:?} failed in {}", self.path().display());
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, contents: &str) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, contents).expect("write fixture file");
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path().join(relative)).expect("read fixture file")
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path().join(relative).exists()
    }

    /// List `.md` files directly inside `relative`, sorted, stems only.
    pub fn ticket_ids_in(&self, relative: &str) -> Vec<String> {
        let dir = self.path().join(relative);
        let Ok(entries) = std::fs::read_dir(&dir) else { return Vec::new() };
        let mut ids: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.path().file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        ids.sort();
        ids
    }

    pub fn kd(&self) -> Kd {
        let mut cmd = Command::cargo_bin("kd").expect("kd binary built");
        cmd.current_dir(self.path());
        Kd { cmd }
    }
}

/// A `kd` invocation under construction, mirroring the teacher's
/// builder-then-assert CLI test idiom.
pub struct Kd {
    cmd: Command,
}

impl Kd {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Finished {
        let output = self.cmd.output().expect("spawn kd");
        assert!(
            output.status.success(),
            "expected success, got {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
        Finished::from(output)
    }

    pub fn fails(mut self) -> Finished {
        let output = self.cmd.output().expect("spawn kd");
        assert!(
            !output.status.success(),
            "expected failure, got success\nstdout: {}",
            String::from_utf8_lossy(&output.stdout),
        );
        Finished::from(output)
    }
}

pub struct Finished {
    pub code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl Finished {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}, got: {}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}, got: {}", self.stderr);
        self
    }

    pub fn code_is(self, expected: i32) -> Self {
        assert_eq!(self.code, Some(expected), "stderr: {}", self.stderr);
        self
    }

    /// Pull the 4-hex ticket id out of a `Created ticket <id>` line.
    pub fn created_ticket_id(&self) -> String {
        self.stdout
            .lines()
            .find_map(|l| l.strip_prefix("Created ticket "))
            .map(str::trim)
            .expect("a 'Created ticket <id>' line")
            .to_string()
    }
}

#[allow(dead_code)]
pub fn kd_dir(root: &Path) -> PathBuf {
    root.join(".kd")
}
