// SPDX-License-Identifier: MIT

//! Human-readable elapsed-time formatting for CLI display (§6.8).

/// Format a duration, given in whole seconds, as a short relative label
/// (`"5s"`, `"2m"`, `"1h"`, `"3d"`). Used by `tk list`/`peasant status` to
/// show "age" and "last updated" columns without pulling in a heavier
/// humantime-style dependency.
pub fn format_elapsed(elapsed_secs: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    if elapsed_secs < MINUTE {
        format!("{elapsed_secs}s")
    } else if elapsed_secs < HOUR {
        format!("{}m", elapsed_secs / MINUTE)
    } else if elapsed_secs < DAY {
        format!("{}h", elapsed_secs / HOUR)
    } else {
        format!("{}d", elapsed_secs / DAY)
    }
}

/// Same as [`format_elapsed`] but takes milliseconds, for callers holding
/// epoch-ms timestamps directly.
pub fn format_elapsed_ms(elapsed_ms: u64) -> String {
    format_elapsed(elapsed_ms / 1000)
}
