use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tags::Tag;

/// Tag -> word -> count table collected from a labeled corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    counts: HashMap<Tag, HashMap<String, u64>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `word` labeled `tag`.
    pub fn observe(&mut self, tag: Tag, word: &str) {
        self.add(tag, word, 1);
    }

    pub fn add(&mut self, tag: Tag, word: &str, count: u64) {
        *self
            .counts
            .entry(tag)
            .or_default()
            .entry(word.to_string())
            .or_insert(0) += count;
    }

    /// Count of `word` under `tag`, 0 when never observed.
    pub fn count(&self, tag: Tag, word: &str) -> u64 {
        self.counts
            .get(&tag)
            .and_then(|words| words.get(word))
            .copied()
            .unwrap_or(0)
    }

    /// Words observed under `tag` with their counts.
    pub fn words(&self, tag: Tag) -> impl Iterator<Item = (&str, u64)> {
        self.counts
            .get(&tag)
            .into_iter()
            .flat_map(|words| words.iter().map(|(w, c)| (w.as_str(), *c)))
    }

    /// Tags with at least one entry.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.counts.keys().copied()
    }

    /// Sum of counts under `tag`.
    pub fn total(&self, tag: Tag) -> u64 {
        self.words(tag).map(|(_, c)| c).sum()
    }

    pub(crate) fn remove(&mut self, tag: Tag, word: &str) -> Option<u64> {
        self.counts.get_mut(&tag).and_then(|words| words.remove(word))
    }
}
