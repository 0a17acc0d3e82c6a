//! # Maximum-Entropy Scorer
//!
//! Log-linear classifier over feature bundles, trained with generalized
//! iterative scaling (GIS).
//!
//! Joint features are `(key, tag)` pairs seen in training. Every bundle has
//! the same number of active keys, so the GIS constant is that number and no
//! correction feature is needed.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use nertag_core::{
    Distribution, FeatureBundle, FeatureKey, LabeledFeatures, Scorer, ScorerTrainer, Tag, TagError,
};

/// One persisted weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WeightEntry {
    key: FeatureKey,
    tag: Tag,
    weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedClassifier {
    labels: Vec<Tag>,
    weights: Vec<WeightEntry>,
}

/// Trained log-linear model `P(tag | bundle) ∝ exp(Σ w(key, tag))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SavedClassifier", into = "SavedClassifier")]
pub struct MaxentClassifier {
    labels: Vec<Tag>,
    weights: HashMap<FeatureKey, Vec<(usize, f64)>>,
}

impl MaxentClassifier {
    /// Labels the classifier can predict, in output order.
    pub fn labels(&self) -> &[Tag] {
        &self.labels
    }

    /// Weight of the joint feature `(key, tag)`, 0 if unseen.
    pub fn weight(&self, key: &FeatureKey, tag: Tag) -> f64 {
        let Some(label) = self.labels.iter().position(|&l| l == tag) else {
            return 0.0;
        };
        self.weights
            .get(key)
            .and_then(|row| row.iter().find(|(l, _)| *l == label))
            .map_or(0.0, |(_, w)| *w)
    }

    /// Number of joint features with a weight.
    pub fn num_features(&self) -> usize {
        self.weights.values().map(Vec::len).sum()
    }

    fn scores(&self, features: &FeatureBundle) -> Vec<f64> {
        let mut scores = vec![0.0; self.labels.len()];
        for key in features.keys() {
            if let Some(row) = self.weights.get(key) {
                for &(label, weight) in row {
                    scores[label] += weight;
                }
            }
        }
        scores
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("failed to write model to {}", path.display()))?;
        info!(path = %path.display(), features = self.num_features(), "saved maxent model");
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let model: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse model {}", path.display()))?;
        info!(path = %path.display(), features = model.num_features(), "loaded maxent model");
        Ok(model)
    }
}

impl Scorer for MaxentClassifier {
    fn prob_classify(&self, features: &FeatureBundle) -> Distribution {
        let probs = softmax(&self.scores(features));
        Distribution::new(self.labels.iter().copied().zip(probs).collect())
    }
}

impl From<SavedClassifier> for MaxentClassifier {
    fn from(saved: SavedClassifier) -> Self {
        let mut weights: HashMap<FeatureKey, Vec<(usize, f64)>> = HashMap::new();
        for entry in saved.weights {
            if let Some(label) = saved.labels.iter().position(|&l| l == entry.tag) {
                weights.entry(entry.key).or_default().push((label, entry.weight));
            }
        }
        Self {
            labels: saved.labels,
            weights,
        }
    }
}

impl From<MaxentClassifier> for SavedClassifier {
    fn from(model: MaxentClassifier) -> Self {
        let mut weights: Vec<WeightEntry> = model
            .weights
            .into_iter()
            .flat_map(|(key, row)| {
                let labels = &model.labels;
                row.into_iter().map(move |(label, weight)| WeightEntry {
                    key: key.clone(),
                    tag: labels[label],
                    weight,
                })
            })
            .collect();
        weights.sort_by(|a, b| a.key.cmp(&b.key).then(a.tag.cmp(&b.tag)));
        Self {
            labels: model.labels,
            weights,
        }
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// GIS trainer for [`MaxentClassifier`].
#[derive(Debug, Clone, Default)]
pub struct GisTrainer {
    /// Stop early once the log-likelihood gains less than this per iteration.
    pub min_ll_delta: Option<f64>,
}

impl GisTrainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_ll_delta(mut self, delta: f64) -> Self {
        self.min_ll_delta = Some(delta);
        self
    }
}

/// Sparse joint-feature encoding of a training set.
struct Encoding {
    labels: Vec<Tag>,
    /// key -> [(label, feature index)]
    index: HashMap<FeatureKey, Vec<(usize, usize)>>,
    num_features: usize,
}

impl Encoding {
    fn build(corpus: &[LabeledFeatures]) -> Self {
        let labels: Vec<Tag> = corpus
            .iter()
            .map(|(_, tag)| *tag)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut index: HashMap<FeatureKey, Vec<(usize, usize)>> = HashMap::new();
        let mut num_features = 0;
        for (bundle, tag) in corpus {
            let label = labels.iter().position(|l| l == tag).unwrap_or(0);
            for key in bundle.keys() {
                let row = index.entry(key.clone()).or_default();
                if !row.iter().any(|(l, _)| *l == label) {
                    row.push((label, num_features));
                    num_features += 1;
                }
            }
        }

        Self {
            labels,
            index,
            num_features,
        }
    }

    fn label(&self, tag: Tag) -> usize {
        self.labels.iter().position(|&l| l == tag).unwrap_or(0)
    }

    fn scores(&self, weights: &[f64], bundle: &FeatureBundle) -> Vec<f64> {
        let mut scores = vec![0.0; self.labels.len()];
        for key in bundle.keys() {
            if let Some(row) = self.index.get(key) {
                for &(label, feature) in row {
                    scores[label] += weights[feature];
                }
            }
        }
        scores
    }
}

impl ScorerTrainer for GisTrainer {
    type Scorer = MaxentClassifier;

    fn train(
        &self,
        corpus: &[LabeledFeatures],
        max_iter: usize,
    ) -> nertag_core::Result<MaxentClassifier> {
        let Some((first, _)) = corpus.first() else {
            return Err(TagError::InvalidConfig("training corpus is empty".into()));
        };
        let encoding = Encoding::build(corpus);
        let n = corpus.len() as f64;
        let constant = first.keys().len() as f64;

        let mut empirical = vec![0.0; encoding.num_features];
        for (bundle, tag) in corpus {
            let label = encoding.label(*tag);
            for key in bundle.keys() {
                if let Some(row) = encoding.index.get(key) {
                    for &(l, feature) in row {
                        if l == label {
                            empirical[feature] += 1.0 / n;
                        }
                    }
                }
            }
        }
        let log_empirical: Vec<f64> = empirical.iter().map(|e| e.ln()).collect();

        info!(
            examples = corpus.len(),
            labels = encoding.labels.len(),
            features = encoding.num_features,
            "training maxent classifier"
        );

        let mut weights = vec![0.0; encoding.num_features];
        let mut prev_ll: Option<f64> = None;
        for iteration in 0..max_iter {
            let mut estimated = vec![0.0; encoding.num_features];
            let mut log_likelihood = 0.0;

            for (bundle, tag) in corpus {
                let probs = softmax(&encoding.scores(&weights, bundle));
                log_likelihood += probs[encoding.label(*tag)].ln() / n;
                for key in bundle.keys() {
                    if let Some(row) = encoding.index.get(key) {
                        for &(label, feature) in row {
                            estimated[feature] += probs[label] / n;
                        }
                    }
                }
            }

            for (w, (emp, est)) in weights.iter_mut().zip(log_empirical.iter().zip(&estimated)) {
                *w += (emp - est.ln()) / constant;
            }

            debug!(iteration = iteration + 1, log_likelihood, "gis iteration");
            if let (Some(prev), Some(delta)) = (prev_ll, self.min_ll_delta) {
                if (log_likelihood - prev).abs() < delta {
                    debug!(iteration = iteration + 1, "log-likelihood converged");
                    break;
                }
            }
            prev_ll = Some(log_likelihood);
        }

        let mut table: HashMap<FeatureKey, Vec<(usize, f64)>> = HashMap::new();
        for (key, row) in encoding.index {
            table.insert(
                key,
                row.into_iter()
                    .map(|(label, feature)| (label, weights[feature]))
                    .collect(),
            );
        }

        Ok(MaxentClassifier {
            labels: encoding.labels,
            weights: table,
        })
    }
}
