//! Bigram counts over tag sequences, with a sentence-start context.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, TagError};
use crate::tags::Tag;

/// The conditioning side of a tag bigram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagContext {
    /// Before the first token of a sentence.
    Start,
    /// After a token labeled with this tag.
    Tag(Tag),
}

impl fmt::Display for TagContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagContext::Start => f.write_str("<s>"),
            TagContext::Tag(tag) => write!(f, "{}", tag),
        }
    }
}

/// Bigram and unigram tallies of tag sequences.
///
/// `tally(Start)` is the number of sentences and `tally(Tag(t))` the number of
/// tokens labeled `t`; `P(t | ctx) = count(ctx, t) / tally(ctx)`.
#[derive(Debug, Clone, Default)]
pub struct BigramCounts {
    bigrams: HashMap<TagContext, HashMap<Tag, u64>>,
    tallies: HashMap<TagContext, u64>,
}

impl BigramCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build counts from a collection of tag sequences.
    pub fn from_sequences<'a, I>(sequences: I) -> Self
    where
        I: IntoIterator<Item = &'a [Tag]>,
    {
        let mut counts = Self::new();
        for seq in sequences {
            counts.observe_sequence(seq);
        }
        counts
    }

    /// Add one sentence's tags. Empty sequences are ignored.
    pub fn observe_sequence(&mut self, tags: &[Tag]) {
        if tags.is_empty() {
            return;
        }
        let mut prev = TagContext::Start;
        *self.tallies.entry(prev).or_insert(0) += 1;
        for &tag in tags {
            *self.bigrams.entry(prev).or_default().entry(tag).or_insert(0) += 1;
            let ctx = TagContext::Tag(tag);
            *self.tallies.entry(ctx).or_insert(0) += 1;
            prev = ctx;
        }
    }

    /// Number of times `tag` followed `ctx`.
    pub fn count(&self, ctx: TagContext, tag: Tag) -> u64 {
        self.bigrams
            .get(&ctx)
            .and_then(|row| row.get(&tag))
            .copied()
            .unwrap_or(0)
    }

    /// Number of times `ctx` occurred as a conditioning context.
    pub fn tally(&self, ctx: TagContext) -> u64 {
        self.tallies.get(&ctx).copied().unwrap_or(0)
    }

    /// Number of tokens labeled `tag`.
    pub fn unigram(&self, tag: Tag) -> u64 {
        self.tally(TagContext::Tag(tag))
    }

    /// Number of sentences observed.
    pub fn sentences(&self) -> u64 {
        self.tally(TagContext::Start)
    }

    /// `P(tag | ctx)` from normalized counts.
    ///
    /// # Errors
    /// Returns `TagError::UnseenContext` if `ctx` never occurred in training.
    pub fn probability(&self, ctx: TagContext, tag: Tag) -> Result<f64> {
        let tally = self.tally(ctx);
        if tally == 0 {
            return Err(TagError::UnseenContext(format!("transition from {}", ctx)));
        }
        Ok(self.count(ctx, tag) as f64 / tally as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BigramCounts {
        let a = [Tag::Person, Tag::Outside, Tag::Outside, Tag::Location];
        let b = [Tag::Outside, Tag::Outside];
        BigramCounts::from_sequences([&a[..], &b[..]])
    }

    #[test]
    fn test_tallies() {
        let counts = sample();
        assert_eq!(counts.sentences(), 2);
        assert_eq!(counts.unigram(Tag::Outside), 4);
        assert_eq!(counts.unigram(Tag::Person), 1);
        assert_eq!(counts.unigram(Tag::Miscellaneous), 0);
    }

    #[test]
    fn test_start_transitions() {
        let counts = sample();
        assert_eq!(counts.probability(TagContext::Start, Tag::Person).unwrap(), 0.5);
        assert_eq!(counts.probability(TagContext::Start, Tag::Outside).unwrap(), 0.5);
        assert_eq!(counts.probability(TagContext::Start, Tag::Location).unwrap(), 0.0);
    }

    #[test]
    fn test_tag_transitions() {
        let counts = sample();
        let from_o = TagContext::Tag(Tag::Outside);
        assert_eq!(counts.count(from_o, Tag::Outside), 2);
        assert_eq!(counts.probability(from_o, Tag::Outside).unwrap(), 0.5);
        assert_eq!(counts.probability(from_o, Tag::Location).unwrap(), 0.25);
        // LOC only ever ends a sentence: seen, but every transition is zero
        let from_loc = TagContext::Tag(Tag::Location);
        assert_eq!(counts.probability(from_loc, Tag::Outside).unwrap(), 0.0);
    }

    #[test]
    fn test_unseen_context() {
        let counts = sample();
        let err = counts
            .probability(TagContext::Tag(Tag::Miscellaneous), Tag::Outside)
            .unwrap_err();
        assert!(err.is_data_error());
        assert!(BigramCounts::new()
            .probability(TagContext::Start, Tag::Outside)
            .is_err());
    }

    #[test]
    fn test_empty_sequence_ignored() {
        let mut counts = BigramCounts::new();
        counts.observe_sequence(&[]);
        assert_eq!(counts.sentences(), 0);
    }
}
