// SPDX-License-Identifier: MIT

//! Branch-name normalization (§6.2).
//!
//! NFKD decompose, drop combining marks, ASCII-fold non-ASCII letters,
//! replace runs of non-`[A-Za-z0-9]` with `-`, lowercase, strip leading and
//! trailing `-`. An empty result is an error rather than a write into the
//! branches root — `start` must never create `.kd/branches//`.

/// Error raised when a branch name normalizes to the empty string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("branch name {0:?} normalizes to an empty slug")]
pub struct EmptySlug(pub String);

/// Normalize a human-provided branch name into a filesystem-safe slug.
pub fn normalize(name: &str) -> Result<String, EmptySlug> {
    let slug = slug::slugify(name);
    if slug.is_empty() {
        Err(EmptySlug(name.to_string()))
    } else {
        Ok(slug)
    }
}

#[cfg(test)]
#[path = "branch_slug_tests.rs"]
mod tests;
