// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside the trie's node arena. The root is always `0`.
pub type NodeId = usize;

pub const ROOT: NodeId = 0;

/// One stored name produced by a depth-first dump.
/// `prefix` is the character path walked from the root; it always equals `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpEntry {
    pub prefix: String,
    pub name: String,
}

impl fmt::Display for DumpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.prefix, self.name)
    }
}

/// Result of a logical delete. "Not found" is an ordinary value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(String),
    NotFound(String),
}

impl DeleteOutcome {
    pub fn name(&self) -> &str {
        match self {
            DeleteOutcome::Deleted(name) | DeleteOutcome::NotFound(name) => name,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted(_))
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteOutcome::Deleted(name) => write!(f, "Name '{}' deleted successfully.", name),
            DeleteOutcome::NotFound(name) => write!(f, "Name '{}' not found for deletion.", name),
        }
    }
}
