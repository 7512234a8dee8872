// File: src/core/stats.rs
use crate::core::trie::TrieStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const ALPHABET_SIZE: usize = 26;
pub const DEFAULT_PROBABILITY: f64 = 0.5;
/// Weight added per occurrence of a character in a stored name.
pub const LETTER_WEIGHT_INCREMENT: f64 = 0.1;

/// One access probability per letter `a`..=`z`.
/// No store operation changes it; it is settable for callers that need to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityVector {
    slots: [f64; ALPHABET_SIZE],
}

impl Default for ProbabilityVector {
    fn default() -> Self {
        Self::filled(DEFAULT_PROBABILITY)
    }
}

impl ProbabilityVector {
    pub fn filled(value: f64) -> Self {
        Self { slots: [value; ALPHABET_SIZE] }
    }

    /// Case-insensitive; returns `None` for anything outside `a`..=`z`.
    pub fn get(&self, letter: char) -> Option<f64> {
        letter_index(letter).map(|i| self.slots[i])
    }

    /// Returns false, leaving the vector untouched, when `letter` has no slot.
    pub fn set(&mut self, letter: char, value: f64) -> bool {
        match letter_index(letter) {
            Some(i) => {
                self.slots[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn slots(&self) -> &[f64; ALPHABET_SIZE] {
        &self.slots
    }

    pub fn average(&self) -> f64 {
        self.slots.iter().sum::<f64>() / ALPHABET_SIZE as f64
    }
}

fn letter_index(letter: char) -> Option<usize> {
    let lower = letter.to_ascii_lowercase();
    lower.is_ascii_lowercase().then(|| (lower as u8 - b'a') as usize)
}

/// Per-character weights derived from the stored names. Letters that appear
/// in no stored name are absent rather than zero.
///
/// Keys are the full lowercase form of one character, which can be longer
/// than one char ('İ' lowercases to "i\u{307}").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LetterWeights(BTreeMap<String, f64>);

impl LetterWeights {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(key, &w)| (key.as_str(), w))
    }
}

impl fmt::Display for LetterWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Access Probabilities:")?;
        for (key, weight) in self.iter() {
            write!(f, "\n{}: {:.2}", key, weight)?;
        }
        Ok(())
    }
}

/// Read-only reports over a [`TrieStore`] plus the fixed probability vector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsReporter {
    pub probabilities: ProbabilityVector,
}

impl StatisticsReporter {
    pub fn new(probabilities: ProbabilityVector) -> Self {
        Self { probabilities }
    }

    /// Recomputed on every call: walks every stored name and adds the fixed
    /// increment per lower-cased character occurrence.
    pub fn letter_weights(&self, trie: &TrieStore) -> LetterWeights {
        let mut weights = BTreeMap::new();
        for name in trie.names() {
            for ch in name.chars() {
                let key: String = ch.to_lowercase().collect();
                *weights.entry(key).or_insert(0.0) += LETTER_WEIGHT_INCREMENT;
            }
        }
        LetterWeights(weights)
    }

    pub fn average_probability(&self) -> f64 {
        self.probabilities.average()
    }
}
