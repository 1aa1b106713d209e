// SPDX-License-Identifier: MIT

//! Shared setup for command handlers: repository root discovery, config
//! loading, and council member construction from config.

use crate::exit_error::ExitError;
use kingdom_core::{Config, KdError};
use kingdom_engine::Member;
use kingdom_storage::{discover_root, KdPaths};
use std::time::Duration;

pub struct Context {
    pub paths: KdPaths,
    pub config: Config,
}

impl Context {
    /// Discover `.kd`/`.git` upward from the current directory and load
    /// `.kd/config.json`, if present. A missing config is not an error —
    /// every field has a default (§4.11).
    pub fn load() -> Result<Self, ExitError> {
        let cwd = std::env::current_dir().map_err(|e| ExitError::new(1, e.to_string()))?;
        let root = discover_root(&cwd)
            .ok_or_else(|| ExitError::new(2, "not inside a Kingdom repository (no .kd or .git found)"))?;
        let paths = KdPaths::new(root);

        let config = match kingdom_core::file_store::read_text(&paths.config_path()) {
            Ok(Some(text)) => Config::parse(&text).map_err(KdError::from)?,
            Ok(None) => Config::default(),
            Err(e) => return Err(ExitError::from(KdError::from(e))),
        };

        Ok(Self { paths, config })
    }

    /// Resolve "the current branch": the explicit `--branch` flag if given,
    /// otherwise the checked-out git branch, normalized (§6.2). Branches
    /// correspond 1:1 with git branch names, so there is no separate
    /// "current branch" pointer to maintain.
    pub fn branch(&self, explicit: Option<&str>) -> Result<String, ExitError> {
        let raw = explicit
            .map(str::to_string)
            .or_else(|| kingdom_storage::git::current_branch(self.paths.root()))
            .ok_or_else(|| ExitError::new(1, "no branch given and no git branch is checked out"))?;
        kingdom_core::branch_slug::normalize(&raw).map_err(|e| ExitError::new(1, e.to_string()))
    }

    /// Build the configured council members, looking each one's adapter up
    /// in the default backend registry (§4.4, §4.11).
    pub fn council_members(&self) -> Result<Vec<Member>, ExitError> {
        let registry = kingdom_adapters::registry::default_registry();
        let mut members = Vec::new();
        for member in &self.config.council.members {
            let adapter = registry
                .get(&member.backend)
                .ok_or_else(|| ExitError::new(1, format!("unknown backend {:?} for member {:?}", member.backend, member.name)))?
                .clone();
            members.push(Member {
                name: member.name.clone(),
                adapter,
                timeout: Duration::from_secs(self.config.council.timeout),
            });
        }
        Ok(members)
    }
}
