// SPDX-License-Identifier: MIT

//! The `query` contract (§4.4 steps 1-7): a single retry/timeout/stream-tee
//! driver shared by every backend, generic over `&dyn AgentAdapter` so the
//! policy is implemented once rather than duplicated per adapter.

use crate::agent::{AgentAdapter, AgentResponse, CommandContext};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

/// Run one query against `adapter`, applying the full retry policy.
///
/// `stream_path`, if given, receives a tee of stdout for the duration of
/// each attempt and is deleted at the end of every attempt — success,
/// failure, or retry — so a tailer never sees stale content left over from
/// a prior attempt (§4.4 step 5).
pub async fn query(
    adapter: &dyn AgentAdapter,
    prompt: &str,
    timeout: Duration,
    mut session_id: Option<String>,
    stream_path: Option<&Path>,
    max_retries: u32,
) -> AgentResponse {
    let mut attempt = 0u32;
    loop {
        let response = run_once(adapter, prompt, timeout, session_id.as_deref(), stream_path).await;
        if let Some(path) = stream_path {
            let _ = tokio::fs::remove_file(path).await;
        }

        let Some(error) = &response.error else {
            return response;
        };
        let retriable = error.split(':').next().map(is_retriable_kind).unwrap_or(false);
        if !retriable || attempt >= max_retries {
            tracing::warn!(agent = adapter.name(), error = error.as_str(), attempt, "query failed, giving up");
            return response;
        }
        if attempt > 0 {
            // First retry reused the original session id; every retry after
            // that starts a fresh backend session.
            session_id = None;
        }
        attempt += 1;
        tracing::info!(agent = adapter.name(), error = error.as_str(), attempt, "retrying query");
    }
}

fn is_retriable_kind(kind: &str) -> bool {
    matches!(kind, "Timeout" | "NonZeroExit" | "Parse")
}

async fn run_once(
    adapter: &dyn AgentAdapter,
    prompt: &str,
    timeout: Duration,
    session_id: Option<&str>,
    stream_path: Option<&Path>,
) -> AgentResponse {
    let ctx = CommandContext { prompt, session_id, streaming: stream_path.is_some(), extra_prompt: None };
    let argv = adapter.build_command(&ctx);
    let Some((program, args)) = argv.split_first() else {
        return AgentResponse::err("CommandNotFound", "adapter produced an empty command");
    };

    let mut command = Command::new(program);
    command
        .args(args)
        .envs(crate::agent::subprocess_env())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .stdin(std::process::Stdio::null());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return AgentResponse::err("CommandNotFound", format!("{program}: {e}"));
        }
        Err(e) => return AgentResponse::err("NonZeroExit", format!("spawn failed: {e}")),
    };

    let stdout = match child.stdout.take() {
        Some(s) => s,
        None => return AgentResponse::err("NonZeroExit", "child had no stdout pipe"),
    };

    let mut stream_file = match stream_path {
        Some(path) => {
            let _ = tokio::fs::remove_file(path).await;
            tokio::fs::OpenOptions::new().create(true).append(true).open(path).await.ok()
        }
        None => None,
    };

    // Reading runs on its own task so a timeout can kill the child without
    // fighting the borrow checker over who owns `stdout`/`stream_file`.
    let reader_handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        let mut reader = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            captured.extend_from_slice(line.as_bytes());
            captured.push(b'\n');
            if let Some(file) = stream_file.as_mut() {
                let _ = file.write_all(line.as_bytes()).await;
                let _ = file.write_all(b"\n").await;
                let _ = file.flush().await;
            }
        }
        captured
    });

    match tokio::time::timeout(timeout, child.wait()).await {
        Err(_) => {
            let _ = child.start_kill();
            let _ = child.wait().await;
            reader_handle.abort();
            tracing::warn!(agent = adapter.name(), timeout_secs = timeout.as_secs(), "killed timed-out child process");
            AgentResponse::err("Timeout", format!("after {}s", timeout.as_secs()))
        }
        Ok(Err(e)) => {
            reader_handle.abort();
            AgentResponse::err("NonZeroExit", e.to_string())
        }
        Ok(Ok(status)) => {
            let captured = reader_handle.await.unwrap_or_default();
            if !status.success() {
                AgentResponse::err("NonZeroExit", format!("exit code {:?}", status.code()))
            } else {
                match adapter.parse_response(&captured) {
                    Ok(response) => response,
                    Err(e) => AgentResponse::err(e.kind_name(), e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
