//! # Probability Models
//!
//! The decoder queries a model for three rows of scores over the tag
//! alphabet: start scores at position 0, step scores for each previous tag,
//! and emission scores for each position. Both model families implement the
//! same capability so the decoder never needs to know which one it holds.

pub mod discriminative;
pub mod features;
pub mod generative;
pub mod sentence;

pub use discriminative::DiscriminativeModel;
pub use features::{
    Distribution, FeatureBundle, FeatureKey, FeatureKind, LabeledFeatures, START_TAG, START_TOKEN,
    Scorer, ScorerTrainer,
};
pub use generative::GenerativeModel;
pub use sentence::Sentence;

use crate::error::Result;
use crate::tags::TagAlphabet;

/// Source of the probabilities a Viterbi search maximizes over.
///
/// Every returned row has one entry per alphabet index. Scores are
/// non-negative; zero is a legitimate value, not an error.
pub trait ProbabilityModel {
    /// The alphabet the rows are indexed by.
    fn alphabet(&self) -> &TagAlphabet;

    /// Score of each tag at position 0, before emissions.
    fn start_scores(&self, sentence: &Sentence) -> Result<Vec<f64>>;

    /// Score of moving from tag index `prev` at `position - 1` to each tag at
    /// `position`. Only called for `position >= 1`.
    fn step_scores(&self, sentence: &Sentence, position: usize, prev: usize) -> Result<Vec<f64>>;

    /// Score of each tag emitting the token at `position`, applied after the
    /// best predecessor is chosen. Defaults to all ones.
    fn emission_scores(&self, _sentence: &Sentence, _position: usize) -> Result<Vec<f64>> {
        Ok(vec![1.0; self.alphabet().len()])
    }
}

impl<M: ProbabilityModel + ?Sized> ProbabilityModel for &M {
    fn alphabet(&self) -> &TagAlphabet {
        (**self).alphabet()
    }

    fn start_scores(&self, sentence: &Sentence) -> Result<Vec<f64>> {
        (**self).start_scores(sentence)
    }

    fn step_scores(&self, sentence: &Sentence, position: usize, prev: usize) -> Result<Vec<f64>> {
        (**self).step_scores(sentence, position, prev)
    }

    fn emission_scores(&self, sentence: &Sentence, position: usize) -> Result<Vec<f64>> {
        (**self).emission_scores(sentence, position)
    }
}

impl<M: ProbabilityModel + ?Sized> ProbabilityModel for Box<M> {
    fn alphabet(&self) -> &TagAlphabet {
        (**self).alphabet()
    }

    fn start_scores(&self, sentence: &Sentence) -> Result<Vec<f64>> {
        (**self).start_scores(sentence)
    }

    fn step_scores(&self, sentence: &Sentence, position: usize, prev: usize) -> Result<Vec<f64>> {
        (**self).step_scores(sentence, position, prev)
    }

    fn emission_scores(&self, sentence: &Sentence, position: usize) -> Result<Vec<f64>> {
        (**self).emission_scores(sentence, position)
    }
}
