// SPDX-License-Identifier: MIT

//! Flat-file persistence for every Kingdom entity under `.kd/` (§4, §6.1).
//!
//! No event log, no WAL, no replay — every entity is a plain file read and
//! written atomically via [`kingdom_core::file_store`]. Each module here
//! owns one slice of the `.kd/` tree and resolves every path through
//! [`KdPaths`]; nothing else in this crate builds a path by hand.

pub mod branch_lifecycle;
pub mod branches;
pub mod git;
pub mod paths;
pub mod peasant_sessions;
pub mod sessions;
pub mod thread_store;
pub mod ticket_store;

pub use branch_lifecycle::{BranchLifecycle, BranchStatusSummary};
pub use paths::{discover_root, KdPaths};
pub use thread_store::ThreadStore;
pub use ticket_store::{Located, MigrationPlan, MigrationStep, TicketScope, TicketStore};
