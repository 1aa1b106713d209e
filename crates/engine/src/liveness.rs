// SPDX-License-Identifier: MIT

//! Process liveness probing for [`crate::peasant::Peasant::status`] (§4.8).
//!
//! On Linux, checking `/proc/<pid>` existing is a dependency-free probe; on
//! other Unix targets (no `/proc`) a signal-0 `kill` is used instead, which
//! the OS guarantees never actually delivers a signal — it only reports
//! whether the pid exists and is visible to this process.

/// Whether a process with the given pid currently exists.
#[cfg(target_os = "linux")]
pub fn is_alive(pid: u32) -> bool {
    std::path::Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(all(unix, not(target_os = "linux")))]
pub fn is_alive(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

#[cfg(not(unix))]
pub fn is_alive(_pid: u32) -> bool {
    false
}
