// SPDX-License-Identifier: MIT

//! Top-level CLI surface specs (§6.6): help/usage text and the
//! outside-a-repository error path.

use crate::support::Project;

#[test]
fn kd_help_shows_usage() {
    let p = Project::empty();
    p.kd().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn kd_tk_help_lists_subcommands() {
    let p = Project::empty();
    p.kd()
        .args(&["tk", "--help"])
        .passes()
        .stdout_has("create")
        .stdout_has("ready")
        .stdout_has("dep");
}

#[test]
fn kd_council_help_lists_subcommands() {
    let p = Project::empty();
    p.kd().args(&["council", "--help"]).passes().stdout_has("ask").stdout_has("watch").stdout_has("retry");
}

/// Any command run outside a Kingdom (or even git) repository fails loudly
/// instead of silently operating on the wrong tree.
#[test]
fn command_outside_any_repo_fails_with_a_clear_message() {
    let p = Project::empty();
    p.kd().args(&["status"]).fails().stderr_has("not inside a Kingdom repository");
}

#[test]
fn init_is_idempotent() {
    let p = Project::empty();
    p.git_init();
    p.kd().args(&["init"]).passes().stdout_has("Initialized .kd/");
    p.kd().args(&["init"]).passes().stdout_has("Initialized .kd/");
    assert!(p.exists(".kd/backlog/tickets"));
}
