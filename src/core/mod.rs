pub mod engine;
pub mod stats;
pub mod trie;
pub mod types;
