//! Item identifiers
//!
//! ID Format:
//! - Backend IDs are taken verbatim (trimmed), e.g. `inv_8213` or a UUID
//! - Derived IDs: `i-{7-char-hash}` (e.g., `i-7f2b4c1`) for records that
//!   arrive without an `id` field
//!
//! Derived hashes come from the canonical JSON of the payload, so two
//! anonymous records with identical payloads get the same ID and are
//! rejected as duplicates when a queue is built.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Item ID must not be empty")]
    Empty,

    #[error("Item ID must not contain control characters: {0:?}")]
    ControlCharacter(String),
}

/// Generates a 7-character hash from a JSON payload
fn generate_hash(payload: &serde_json::Value) -> String {
    let canonical = payload.to_string();
    let hash = blake3::hash(canonical.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Stable identifier of a decidable item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Derives an ID from the item's payload
    pub fn derived(payload: &serde_json::Value) -> Self {
        Self(format!("i-{}", generate_hash(payload)))
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this ID was derived from a payload hash
    pub fn is_derived(&self) -> bool {
        self.0.len() == 9
            && self.0.starts_with("i-")
            && self.0[2..].chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        if s.chars().any(char::is_control) {
            return Err(IdError::ControlCharacter(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ItemId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
