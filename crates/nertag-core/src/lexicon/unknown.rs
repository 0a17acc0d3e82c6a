//! # Unknown-Word Folding
//!
//! Rare training words are merged into a single `<UNK>` bucket so the
//! generative model has emission mass for tokens it never saw.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Result, TagError};
use crate::lexicon::table::Lexicon;
use crate::lexicon::vocabulary::{UNKNOWN_WORD, Vocabulary};

/// Maximum number of words folded by default.
pub const DEFAULT_UNKNOWN_CAP: usize = 20;

/// Vocabulary after folding, together with the folded words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedVocabulary {
    pub vocabulary: Vocabulary,
    pub unknown: HashSet<String>,
}

/// Decides which tokens count as unknown and folds their counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownWordPolicy {
    cap: usize,
    frequency: u64,
}

impl Default for UnknownWordPolicy {
    fn default() -> Self {
        Self {
            cap: DEFAULT_UNKNOWN_CAP,
            frequency: 1,
        }
    }
}

impl UnknownWordPolicy {
    /// Policy folding at most `cap` words of frequency exactly 1.
    ///
    /// # Errors
    /// Returns `TagError::InvalidConfig` if `cap` is zero.
    pub fn new(cap: usize) -> Result<Self> {
        Self::with_frequency(cap, 1)
    }

    /// Policy folding at most `cap` words whose frequency equals `frequency`.
    ///
    /// # Errors
    /// Returns `TagError::InvalidConfig` if `cap` or `frequency` is zero.
    pub fn with_frequency(cap: usize, frequency: u64) -> Result<Self> {
        if cap == 0 {
            return Err(TagError::InvalidConfig("unknown-word cap must be positive".into()));
        }
        if frequency == 0 {
            return Err(TagError::InvalidConfig(
                "unknown-word frequency must be positive".into(),
            ));
        }
        Ok(Self { cap, frequency })
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    /// Select unknown words from `vocab` in insertion order.
    ///
    /// Matching words are dropped from the returned vocabulary. Only when the
    /// cap is reached is an `<UNK>` entry appended, carrying the folded total;
    /// below the cap the vocabulary gets no `<UNK>` entry at all.
    pub fn fold_vocabulary(&self, vocab: &Vocabulary) -> FoldedVocabulary {
        let mut unknown = HashSet::new();
        let mut folded_freq = 0u64;
        let mut capped = false;
        let mut kept = Vocabulary::new();

        for (word, freq) in vocab.iter() {
            if !capped && freq == self.frequency {
                unknown.insert(word.to_string());
                folded_freq += freq;
                capped = unknown.len() == self.cap;
                continue;
            }
            kept.add(word, freq);
        }

        if capped {
            kept.add(UNKNOWN_WORD, folded_freq);
        }
        debug!(
            folded = unknown.len(),
            capped,
            remaining = kept.len(),
            "folded rare words into {}",
            UNKNOWN_WORD
        );

        FoldedVocabulary {
            vocabulary: kept,
            unknown,
        }
    }

    /// Merge every unknown word's count into its tag's `<UNK>` entry.
    pub fn fold_lexicon(&self, lexicon: &Lexicon, unknown: &HashSet<String>) -> Lexicon {
        let mut folded = lexicon.clone();
        for tag in lexicon.tags() {
            for (word, _) in lexicon.words(tag) {
                if !unknown.contains(word) {
                    continue;
                }
                if let Some(count) = folded.remove(tag, word) {
                    folded.add(tag, UNKNOWN_WORD, count);
                }
            }
        }
        folded
    }
}
