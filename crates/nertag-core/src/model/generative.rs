//! # Generative (HMM) Model
//!
//! Emission probabilities `P(word | tag)` from a frequency lexicon and
//! transition probabilities `P(tag | prev)` from tag bigram counts.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Result, TagError};
use crate::lexicon::{
    BigramCounts, Lexicon, TagContext, UNKNOWN_WORD, UnknownWordPolicy, Vocabulary,
};
use crate::model::{ProbabilityModel, Sentence};
use crate::tags::{Tag, TagAlphabet};

/// Bigram-transition / lexicon model.
#[derive(Debug, Clone)]
pub struct GenerativeModel {
    alphabet: TagAlphabet,
    vocabulary: Vocabulary,
    lexicon: Lexicon,
    bigrams: BigramCounts,
    unknown: HashSet<String>,
}

impl GenerativeModel {
    /// Create a model from tables that are used as given, with no folding.
    pub fn new(
        alphabet: TagAlphabet,
        vocabulary: Vocabulary,
        lexicon: Lexicon,
        bigrams: BigramCounts,
    ) -> Self {
        Self {
            alphabet,
            vocabulary,
            lexicon,
            bigrams,
            unknown: HashSet::new(),
        }
    }

    /// Create a model after folding rare words into `<UNK>` with `policy`.
    ///
    /// The input tables are not modified.
    pub fn build(
        alphabet: TagAlphabet,
        vocabulary: &Vocabulary,
        lexicon: &Lexicon,
        bigrams: BigramCounts,
        policy: &UnknownWordPolicy,
    ) -> Self {
        let folded = policy.fold_vocabulary(vocabulary);
        let lexicon = policy.fold_lexicon(lexicon, &folded.unknown);
        debug!(
            vocabulary = folded.vocabulary.len(),
            unknown = folded.unknown.len(),
            sentences = bigrams.sentences(),
            "built generative model"
        );
        Self {
            alphabet,
            vocabulary: folded.vocabulary,
            lexicon,
            bigrams,
            unknown: folded.unknown,
        }
    }

    /// `P(word | tag)`. Words outside the vocabulary are looked up as `<UNK>`.
    ///
    /// # Errors
    /// Returns `TagError::UnseenContext` if `tag` never occurred in training.
    pub fn emission_prob(&self, word: &str, tag: Tag) -> Result<f64> {
        let word = if self.vocabulary.contains(word) {
            word
        } else {
            UNKNOWN_WORD
        };
        let denominator = self.bigrams.unigram(tag);
        if denominator == 0 {
            return Err(TagError::UnseenContext(format!("emissions of {}", tag)));
        }
        Ok(self.lexicon.count(tag, word) as f64 / denominator as f64)
    }

    /// `P(tag | ctx)`.
    ///
    /// # Errors
    /// Returns `TagError::UnseenContext` if `ctx` never occurred in training.
    pub fn transition_prob(&self, ctx: TagContext, tag: Tag) -> Result<f64> {
        self.bigrams.probability(ctx, tag)
    }

    /// Words folded into `<UNK>` at construction.
    pub fn unknown_words(&self) -> &HashSet<String> {
        &self.unknown
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn row<F>(&self, mut f: F) -> Result<Vec<f64>>
    where
        F: FnMut(Tag) -> Result<f64>,
    {
        self.alphabet.tags().iter().map(|&tag| f(tag)).collect()
    }
}

impl ProbabilityModel for GenerativeModel {
    fn alphabet(&self) -> &TagAlphabet {
        &self.alphabet
    }

    fn start_scores(&self, _sentence: &Sentence) -> Result<Vec<f64>> {
        self.row(|tag| self.transition_prob(TagContext::Start, tag))
    }

    fn step_scores(&self, _sentence: &Sentence, _position: usize, prev: usize) -> Result<Vec<f64>> {
        let prev = self
            .alphabet
            .tag(prev)
            .ok_or_else(|| TagError::InvalidTag(format!("index {}", prev)))?;
        self.row(|tag| self.transition_prob(TagContext::Tag(prev), tag))
    }

    fn emission_scores(&self, sentence: &Sentence, position: usize) -> Result<Vec<f64>> {
        let word = sentence.token(position)?;
        self.row(|tag| self.emission_prob(word, tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> GenerativeModel {
        let mut vocabulary = Vocabulary::new();
        let mut lexicon = Lexicon::new();
        for (word, tag) in [
            ("John", Tag::Person),
            ("lives", Tag::Outside),
            ("in", Tag::Outside),
            ("Paris", Tag::Location),
            ("Acme", Tag::Organization),
            ("Euro", Tag::Miscellaneous),
            ("in", Tag::Outside),
        ] {
            vocabulary.observe(word);
            lexicon.observe(tag, word);
        }
        let sequences: [&[Tag]; 2] = [
            &[Tag::Person, Tag::Outside, Tag::Outside, Tag::Location],
            &[Tag::Organization, Tag::Miscellaneous, Tag::Outside],
        ];
        let bigrams = BigramCounts::from_sequences(sequences);
        GenerativeModel::new(TagAlphabet::standard(), vocabulary, lexicon, bigrams)
    }

    #[test]
    fn test_emission_prob() {
        let model = model();
        // three O tokens in the bigram tallies, "in" seen twice as O
        assert!((model.emission_prob("in", Tag::Outside).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(model.emission_prob("John", Tag::Person).unwrap(), 1.0);
        assert_eq!(model.emission_prob("John", Tag::Location).unwrap(), 0.0);
    }

    #[test]
    fn test_unknown_word_without_bucket_is_zero() {
        let model = model();
        assert_eq!(model.emission_prob("Berlin", Tag::Location).unwrap(), 0.0);
    }

    #[test]
    fn test_transition_prob() {
        let model = model();
        assert_eq!(model.transition_prob(TagContext::Start, Tag::Person).unwrap(), 0.5);
        assert!(
            (model
                .transition_prob(TagContext::Tag(Tag::Outside), Tag::Location)
                .unwrap()
                - 1.0 / 3.0)
                .abs()
                < 1e-12
        );
    }

    #[test]
    fn test_unseen_tag_is_data_error() {
        let bigrams = BigramCounts::from_sequences([&[Tag::Outside][..]]);
        let model = GenerativeModel::new(
            TagAlphabet::standard(),
            Vocabulary::new(),
            Lexicon::new(),
            bigrams,
        );
        assert!(model.emission_prob("x", Tag::Person).unwrap_err().is_data_error());
        assert!(model
            .transition_prob(TagContext::Tag(Tag::Person), Tag::Outside)
            .unwrap_err()
            .is_data_error());
    }

    #[test]
    fn test_build_folds_unknowns() {
        let mut vocabulary = Vocabulary::new();
        vocabulary.add("the", 3);
        vocabulary.add("Zed", 1);
        let mut lexicon = Lexicon::new();
        lexicon.add(Tag::Outside, "the", 3);
        lexicon.add(Tag::Person, "Zed", 1);
        let bigrams = BigramCounts::from_sequences([
            &[Tag::Outside, Tag::Outside, Tag::Outside, Tag::Person][..],
        ]);

        let model = GenerativeModel::build(
            TagAlphabet::standard(),
            &vocabulary,
            &lexicon,
            bigrams,
            &UnknownWordPolicy::default(),
        );
        assert!(model.unknown_words().contains("Zed"));
        assert!(!model.vocabulary().contains("Zed"));
        // an unseen word now borrows the folded PER mass
        assert_eq!(model.emission_prob("Quux", Tag::Person).unwrap(), 1.0);
        assert_eq!(model.emission_prob("Zed", Tag::Person).unwrap(), 1.0);
    }

    #[test]
    fn test_rows_follow_alphabet() {
        let model = model();
        let sentence = Sentence::from_text("John lives").unwrap();
        let start = model.start_scores(&sentence).unwrap();
        assert_eq!(start, vec![0.0, 0.5, 0.0, 0.5, 0.0]);
        let emissions = model.emission_scores(&sentence, 0).unwrap();
        assert_eq!(emissions, vec![0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_emission_position_past_end() {
        let model = model();
        let sentence = Sentence::from_text("John lives").unwrap();
        let err = model.emission_scores(&sentence, 2).unwrap_err();
        assert!(err.is_input_error());
        assert!(matches!(err, TagError::PositionOutOfRange { position: 2, len: 2 }));
    }
}
