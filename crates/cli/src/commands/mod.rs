// SPDX-License-Identifier: MIT

//! CLI command implementations

pub mod branch;
pub mod breakdown;
pub mod council;
pub mod design;
pub mod doctor;
pub mod init;
pub mod migrate;
pub mod peasant;
pub mod tk;
pub mod work;
