// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kingdom-engine: the orchestration layer composing `kingdom-storage` and
//! `kingdom-adapters` (§4.6, §4.8, §4.9).
//!
//! Nothing here keeps process-wide state — `Council` and `Peasant` are
//! constructed fresh per command invocation from a `KdPaths` the caller
//! already resolved, per the "no global singletons" design note (§9).

pub mod agent_loop;
pub mod council;
pub mod liveness;
pub mod mentions;
pub mod peasant;

pub use agent_loop::{AgentLoop, AgentLoopOutcome};
pub use council::{AskOutcome, Council, Member, WatchOutcome};
pub use peasant::Peasant;
