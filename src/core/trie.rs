// --- File: src/core/trie.rs
use crate::core::types::{DeleteOutcome, DumpEntry, NodeId, ROOT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TrieNode {
    children: BTreeMap<char, NodeId>,
    /// Set only when an inserted name ends exactly at this node.
    stored_value: Option<String>,
}

impl TrieNode {
    fn new() -> Self {
        Self { children: BTreeMap::new(), stored_value: None }
    }
}

/// The name prefix tree. Nodes live in a flat arena and refer to their
/// children by index, so the tree has a single owner and no back-references.
///
/// Nodes are only ever appended: `delete` clears the terminal marker and
/// leaves the path in place.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrieStore {
    nodes: Vec<TrieNode>,
    stored: usize,
}

impl Default for TrieStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieStore {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::new()], stored: 0 }
    }

    /// Walks the path of `name`, creating missing nodes, and marks the last
    /// node as holding `name`. The empty name marks the root.
    /// O(k) complexity where k is the name length in chars.
    pub fn insert(&mut self, name: &str) {
        let mut node_idx = ROOT;
        for ch in name.chars() {
            node_idx = if let Some(&id) = self.nodes[node_idx].children.get(&ch) {
                id
            } else {
                let new_node_id = self.nodes.len();
                self.nodes.push(TrieNode::new());
                self.nodes[node_idx].children.insert(ch, new_node_id);
                new_node_id
            };
        }

        let node = &mut self.nodes[node_idx];
        if node.stored_value.is_none() {
            self.stored += 1;
        }
        node.stored_value = Some(name.to_string());
    }

    /// True only if `name` was inserted and not deleted since. A name that is
    /// merely a prefix of a stored name is not found.
    pub fn lookup(&self, name: &str) -> bool {
        self.find(name)
            .map_or(false, |idx| self.nodes[idx].stored_value.is_some())
    }

    /// Logical delete: clears the terminal marker, structural nodes remain.
    pub fn delete(&mut self, name: &str) -> DeleteOutcome {
        let Some(idx) = self.find(name) else {
            return DeleteOutcome::NotFound(name.to_string());
        };
        match self.nodes[idx].stored_value.take() {
            Some(_) => {
                self.stored -= 1;
                DeleteOutcome::Deleted(name.to_string())
            }
            None => DeleteOutcome::NotFound(name.to_string()),
        }
    }

    /// Depth-first, pre-order walk over every stored name. Children are
    /// visited in ascending character order. Each call starts a fresh walk.
    pub fn dump(&self) -> Dump<'_> {
        Dump { trie: self, stack: vec![(ROOT, String::new())] }
    }

    /// Newline-joined `<prefix> (<name>)` lines, no trailing newline.
    pub fn render_dump(&self) -> String {
        self.dump()
            .map(|entry| entry.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Iterates the stored names only, in dump order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        let mut stack = vec![ROOT];
        std::iter::from_fn(move || {
            while let Some(idx) = stack.pop() {
                let node = &self.nodes[idx];
                stack.extend(node.children.values().rev());
                if let Some(name) = node.stored_value.as_deref() {
                    return Some(name);
                }
            }
            None
        })
    }

    /// Number of stored names.
    pub fn len(&self) -> usize {
        self.stored
    }

    pub fn is_empty(&self) -> bool {
        self.stored == 0
    }

    /// Number of structural nodes including the root. Never decreases.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Checks the arena decoded from untrusted bytes: a root exists, every
    /// child id is in bounds, each node is reached exactly once from the root,
    /// and the stored-name count matches the markers.
    pub fn validate(&self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let mut seen = vec![false; self.nodes.len()];
        seen[ROOT] = true;
        let mut stack = vec![ROOT];
        let mut stored = 0;
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.stored_value.is_some() {
                stored += 1;
            }
            for &child in node.children.values() {
                match seen.get_mut(child) {
                    Some(visited) if !*visited => *visited = true,
                    _ => return false,
                }
                stack.push(child);
            }
        }
        stored == self.stored && seen.iter().all(|&visited| visited)
    }

    fn find(&self, name: &str) -> Option<NodeId> {
        let mut node_idx = ROOT;
        for ch in name.chars() {
            node_idx = *self.nodes[node_idx].children.get(&ch)?;
        }
        Some(node_idx)
    }
}

/// Lazy dump sequence returned by [`TrieStore::dump`].
pub struct Dump<'a> {
    trie: &'a TrieStore,
    stack: Vec<(NodeId, String)>,
}

impl Iterator for Dump<'_> {
    type Item = DumpEntry;

    fn next(&mut self) -> Option<DumpEntry> {
        while let Some((idx, prefix)) = self.stack.pop() {
            let node = &self.trie.nodes[idx];
            // Reverse so the smallest key is popped first.
            for (&ch, &child) in node.children.iter().rev() {
                let mut child_prefix = prefix.clone();
                child_prefix.push(ch);
                self.stack.push((child, child_prefix));
            }
            if let Some(name) = &node.stored_value {
                return Some(DumpEntry { prefix, name: name.clone() });
            }
        }
        None
    }
}
