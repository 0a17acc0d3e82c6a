//! # Nertag Trainer
//!
//! Corpus loading, model training and evaluation around `nertag-core`.
//! Reads the three-line corpus format, trains the HMM, MEMM and baseline
//! taggers, scores them against gold data and writes span predictions as
//! Kaggle-style CSV.

pub mod data;
pub mod evaluation;
pub mod maxent;
pub mod report;
pub mod trainer;

pub use data::{IndexedSentence, LabeledSentence, load_corpus, load_test_corpus};
pub use evaluation::Evaluation;
pub use maxent::{GisTrainer, MaxentClassifier};
pub use report::{save_predictions, write_predictions};
pub use trainer::{ModelKind, TrainedTagger, build, evaluate, predict};
