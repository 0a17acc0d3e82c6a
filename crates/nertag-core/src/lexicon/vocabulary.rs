use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Placeholder word that absorbs the counts of rare tokens.
pub const UNKNOWN_WORD: &str = "<UNK>";

/// Word frequencies in first-seen order.
///
/// Iteration order is insertion order, which the unknown-word policy relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(String, u64)>", into = "Vec<(String, u64)>")]
pub struct Vocabulary {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `word`.
    pub fn observe(&mut self, word: &str) {
        self.add(word, 1);
    }

    /// Add `freq` occurrences of `word`, appending it if new.
    pub fn add(&mut self, word: &str, freq: u64) {
        match self.index.get(word) {
            Some(&i) => self.entries[i].1 += freq,
            None => {
                self.index.insert(word.to_string(), self.entries.len());
                self.entries.push((word.to_string(), freq));
            }
        }
    }

    /// Frequency of `word`, if present.
    pub fn get(&self, word: &str) -> Option<u64> {
        self.index.get(word).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(w, f)| (w.as_str(), *f))
    }

    /// Sum of all frequencies.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, f)| f).sum()
    }
}

impl From<Vec<(String, u64)>> for Vocabulary {
    fn from(entries: Vec<(String, u64)>) -> Self {
        let mut vocab = Self::new();
        for (word, freq) in entries {
            vocab.add(&word, freq);
        }
        vocab
    }
}

impl From<Vocabulary> for Vec<(String, u64)> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.entries
    }
}

impl<'a> FromIterator<&'a str> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut vocab = Self::new();
        for word in iter {
            vocab.observe(word);
        }
        vocab
    }
}
