//! # Discriminative (MEMM) Model
//!
//! Local distributions `P(tag | previous tag, previous token, token, POS)`
//! supplied by a pretrained [`Scorer`].

use tracing::info;

use crate::error::{Result, TagError};
use crate::model::features::{Distribution, FeatureBundle, LabeledFeatures, Scorer, ScorerTrainer};
use crate::model::{ProbabilityModel, Sentence};
use crate::tags::TagAlphabet;

/// Maximum-entropy Markov model over a scorer `S`.
#[derive(Debug, Clone)]
pub struct DiscriminativeModel<S> {
    alphabet: TagAlphabet,
    scorer: S,
}

impl<S: Scorer> DiscriminativeModel<S> {
    pub fn new(alphabet: TagAlphabet, scorer: S) -> Self {
        Self { alphabet, scorer }
    }

    /// Fit a scorer on `corpus` with `trainer` and wrap it.
    ///
    /// # Errors
    /// Returns `TagError::InvalidConfig` if `iterations` is zero or `corpus`
    /// is empty, or whatever the trainer reports.
    pub fn train<T>(
        alphabet: TagAlphabet,
        corpus: &[LabeledFeatures],
        iterations: usize,
        trainer: &T,
    ) -> Result<Self>
    where
        T: ScorerTrainer<Scorer = S>,
    {
        if iterations == 0 {
            return Err(TagError::InvalidConfig(
                "training iterations must be positive".into(),
            ));
        }
        if corpus.is_empty() {
            return Err(TagError::InvalidConfig("training corpus is empty".into()));
        }
        info!(examples = corpus.len(), iterations, "training discriminative scorer");
        let scorer = trainer.train(corpus, iterations)?;
        Ok(Self::new(alphabet, scorer))
    }

    /// Local distribution at `position`, given the previous tag index.
    ///
    /// `prev` is ignored at position 0, where the sentinels are used.
    ///
    /// # Errors
    /// Returns `TagError::PositionOutOfRange` past the end of the sentence,
    /// `TagError::MissingPos` without POS tags.
    pub fn distribution(
        &self,
        sentence: &Sentence,
        position: usize,
        prev: Option<usize>,
    ) -> Result<Distribution> {
        let token = sentence.token(position)?;
        let pos = &sentence.require_pos()?[position];
        let bundle = match (position, prev) {
            (0, _) | (_, None) => FeatureBundle::sentence_start(token, pos),
            (i, Some(prev)) => {
                let prev_tag = self
                    .alphabet
                    .tag(prev)
                    .ok_or_else(|| TagError::InvalidTag(format!("index {}", prev)))?;
                FeatureBundle::following(&sentence.tokens()[i - 1], prev_tag, token, pos)
            }
        };
        Ok(self.scorer.prob_classify(&bundle))
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    fn row(&self, dist: &Distribution) -> Vec<f64> {
        self.alphabet.tags().iter().map(|&tag| dist.prob(tag)).collect()
    }
}

impl<S: Scorer> ProbabilityModel for DiscriminativeModel<S> {
    fn alphabet(&self) -> &TagAlphabet {
        &self.alphabet
    }

    fn start_scores(&self, sentence: &Sentence) -> Result<Vec<f64>> {
        let dist = self.distribution(sentence, 0, None)?;
        Ok(self.row(&dist))
    }

    fn step_scores(&self, sentence: &Sentence, position: usize, prev: usize) -> Result<Vec<f64>> {
        let dist = self.distribution(sentence, position, Some(prev))?;
        Ok(self.row(&dist))
    }
}
