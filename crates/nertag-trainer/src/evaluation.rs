//! Token-level scoring of predicted BIO sequences against gold labels.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Result, bail};
use serde::Serialize;

use nertag_core::BioTag;

/// Per-label counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelMeasure {
    /// Correct predictions of this label.
    pub num_correct: usize,
    /// Occurrences in the gold data.
    pub num_observation: usize,
    /// Occurrences in the predictions.
    pub num_prediction: usize,
}

impl LabelMeasure {
    pub fn precision(&self) -> f64 {
        ratio(self.num_correct, self.num_prediction)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.num_correct, self.num_observation)
    }

    pub fn fmeasure(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }
}

/// Accumulated results over a corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Evaluation {
    labels: BTreeMap<String, LabelMeasure>,
    item_correct: usize,
    item_total: usize,
    inst_correct: usize,
    inst_total: usize,
}

impl Evaluation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score one sentence.
    pub fn accumulate(&mut self, gold: &[BioTag], predicted: &[BioTag]) -> Result<()> {
        if gold.len() != predicted.len() {
            bail!(
                "gold sequence has {} labels but prediction has {}",
                gold.len(),
                predicted.len()
            );
        }

        let mut all_correct = true;
        for (g, p) in gold.iter().zip(predicted) {
            self.labels.entry(g.to_string()).or_default().num_observation += 1;
            let measure = self.labels.entry(p.to_string()).or_default();
            measure.num_prediction += 1;
            if g == p {
                measure.num_correct += 1;
                self.item_correct += 1;
            } else {
                all_correct = false;
            }
            self.item_total += 1;
        }

        if all_correct {
            self.inst_correct += 1;
        }
        self.inst_total += 1;
        Ok(())
    }

    /// Fraction of tokens labeled correctly.
    pub fn accuracy(&self) -> f64 {
        ratio(self.item_correct, self.item_total)
    }

    /// Fraction of sentences labeled entirely correctly.
    pub fn sentence_accuracy(&self) -> f64 {
        ratio(self.inst_correct, self.inst_total)
    }

    pub fn correct(&self) -> usize {
        self.item_correct
    }

    pub fn total(&self) -> usize {
        self.item_total
    }

    pub fn label(&self, label: &str) -> Option<&LabelMeasure> {
        self.labels.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, &LabelMeasure)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Unweighted mean of per-label F1.
    pub fn macro_fmeasure(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.labels.values().map(LabelMeasure::fmeasure).sum::<f64>() / self.labels.len() as f64
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Performance by label (#match, #model, #ref) (precision, recall, F1):")?;
        for (label, m) in &self.labels {
            writeln!(
                f,
                "    {}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                label,
                m.num_correct,
                m.num_prediction,
                m.num_observation,
                m.precision(),
                m.recall(),
                m.fmeasure()
            )?;
        }
        writeln!(f, "Macro-average F1: {:.4}", self.macro_fmeasure())?;
        writeln!(
            f,
            "Item accuracy: {} / {} ({:.4})",
            self.item_correct,
            self.item_total,
            self.accuracy()
        )?;
        write!(
            f,
            "Instance accuracy: {} / {} ({:.4})",
            self.inst_correct,
            self.inst_total,
            self.sentence_accuracy()
        )
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}
