//! # Feature Bundles
//!
//! Local context handed to a discriminative scorer: the previous token, the
//! previous tag, the current token and the current part of speech.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tags::Tag;

/// Previous-token value at the start of a sentence.
pub const START_TOKEN: &str = "<t>";

/// Previous-tag value at the start of a sentence.
pub const START_TAG: &str = "<n>";

/// Which slot of the context a key describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureKind {
    PrevToken,
    PrevTag,
    Token,
    Pos,
}

/// A single boolean indicator, e.g. `token=Paris`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureKey {
    pub kind: FeatureKind,
    pub value: String,
}

impl FeatureKey {
    pub fn new(kind: FeatureKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            FeatureKind::PrevToken => "prev_token",
            FeatureKind::PrevTag => "prev_tag",
            FeatureKind::Token => "token",
            FeatureKind::Pos => "pos",
        };
        write!(f, "{}={}", name, self.value)
    }
}

/// The set of active indicators at one (position, previous tag) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureBundle {
    keys: [FeatureKey; 4],
}

impl FeatureBundle {
    pub fn new(prev_token: &str, prev_tag: &str, token: &str, pos: &str) -> Self {
        Self {
            keys: [
                FeatureKey::new(FeatureKind::PrevToken, prev_token),
                FeatureKey::new(FeatureKind::PrevTag, prev_tag),
                FeatureKey::new(FeatureKind::Token, token),
                FeatureKey::new(FeatureKind::Pos, pos),
            ],
        }
    }

    /// Bundle for the first token, with sentinel previous token and tag.
    pub fn sentence_start(token: &str, pos: &str) -> Self {
        Self::new(START_TOKEN, START_TAG, token, pos)
    }

    /// Bundle for a token following `prev_token` labeled `prev_tag`.
    pub fn following(prev_token: &str, prev_tag: Tag, token: &str, pos: &str) -> Self {
        Self::new(prev_token, &prev_tag.to_string(), token, pos)
    }

    pub fn keys(&self) -> &[FeatureKey] {
        &self.keys
    }
}

/// Probability of each tag given a feature bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    probs: Vec<(Tag, f64)>,
}

impl Distribution {
    pub fn new(probs: Vec<(Tag, f64)>) -> Self {
        Self { probs }
    }

    /// Probability of `tag`, 0 for tags the scorer does not know.
    pub fn prob(&self, tag: Tag) -> f64 {
        self.probs
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }

    /// Most probable tag; the first listed wins ties.
    pub fn best(&self) -> Option<Tag> {
        let mut best: Option<(Tag, f64)> = None;
        for &(tag, p) in &self.probs {
            if best.is_none_or(|(_, bp)| p > bp) {
                best = Some((tag, p));
            }
        }
        best.map(|(tag, _)| tag)
    }

    pub fn total(&self) -> f64 {
        self.probs.iter().map(|(_, p)| p).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tag, f64)> + '_ {
        self.probs.iter().copied()
    }
}

/// A labeled training example for a scorer.
pub type LabeledFeatures = (FeatureBundle, Tag);

/// A pretrained classifier over feature bundles.
pub trait Scorer {
    /// Distribution over tags for `features`.
    fn prob_classify(&self, features: &FeatureBundle) -> Distribution;
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn prob_classify(&self, features: &FeatureBundle) -> Distribution {
        (**self).prob_classify(features)
    }
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn prob_classify(&self, features: &FeatureBundle) -> Distribution {
        (**self).prob_classify(features)
    }
}

impl<S: Scorer + ?Sized> Scorer for std::sync::Arc<S> {
    fn prob_classify(&self, features: &FeatureBundle) -> Distribution {
        (**self).prob_classify(features)
    }
}

/// Produces a scorer from labeled feature examples.
pub trait ScorerTrainer {
    type Scorer: Scorer;

    /// Fit a scorer with at most `max_iter` optimizer iterations.
    fn train(&self, corpus: &[LabeledFeatures], max_iter: usize) -> Result<Self::Scorer>;
}
