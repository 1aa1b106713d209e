// SPDX-License-Identifier: MIT

//! Ticket identifiers.
//!
//! Unlike the opaque, prefixed, 23-byte IDs used elsewhere in this
//! ecosystem, a [`TicketId`] is exactly 4 lowercase hex characters with no
//! type prefix — short enough to type by hand and to embed directly in a
//! branch name (`worktrees/<ticket>/`) or a thread id (`<ticket>-work`).

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

const HEX_ALPHABET: [char; 16] =
    ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f'];

/// A ticket identifier: exactly 4 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketId([u8; 4]);

/// Error returned when a string does not match `[0-9a-f]{4}`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid ticket id {0:?}: must be exactly 4 lowercase hex characters")]
pub struct InvalidTicketId(pub String);

impl TicketId {
    /// Generate a new ticket id from cryptographic randomness. Callers are
    /// responsible for the collision check against existing tickets (§4.7);
    /// this function alone does not guarantee global uniqueness.
    pub fn generate() -> Self {
        let s = nanoid::nanoid!(4, &HEX_ALPHABET);
        // nanoid! with a 16-symbol alphabet always yields valid hex.
        Self::from_str(&s).unwrap_or(Self([b'0', b'0', b'0', b'0']))
    }

    pub fn as_str(&self) -> &str {
        // Invariant: constructed only from validated ASCII hex bytes.
        std::str::from_utf8(&self.0).unwrap_or("0000")
    }
}

impl FromStr for TicketId {
    type Err = InvalidTicketId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
        {
            return Err(InvalidTicketId(s.to_string()));
        }
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }
}

impl TryFrom<String> for TicketId {
    type Error = InvalidTicketId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s)
    }
}

impl From<TicketId> for String {
    fn from(id: TicketId) -> Self {
        id.as_str().to_string()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for TicketId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for TicketId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for TicketId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for TicketId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Returns a string slice truncated to at most `n` characters.
pub fn short(s: &str, n: usize) -> &str {
    if s.len() <= n {
        s
    } else {
        &s[..n]
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
