//! # Nertag Core
//!
//! Named-entity tagging over the `O, PER, LOC, ORG, MISC` tag set. Provides a
//! generative (HMM) and a discriminative (MEMM) probability model, a Viterbi
//! decoder shared by both, and BIO chunking into entity spans.
//!
//! ## Quick Start
//!
//! ```rust
//! use nertag_core::{
//!     BigramCounts, EntityType, GenerativeModel, Lexicon, Sentence, Tag, TagAlphabet, Tagger,
//!     Vocabulary,
//! };
//!
//! let words = ["John", "lives", "in", "Paris", "Acme", "Euro"];
//! let tags = [
//!     Tag::Person,
//!     Tag::Outside,
//!     Tag::Outside,
//!     Tag::Location,
//!     Tag::Organization,
//!     Tag::Miscellaneous,
//! ];
//!
//! let mut vocabulary = Vocabulary::new();
//! let mut lexicon = Lexicon::new();
//! for (word, &tag) in words.iter().zip(&tags) {
//!     vocabulary.observe(word);
//!     lexicon.observe(tag, word);
//! }
//! let bigrams = BigramCounts::from_sequences([&tags[..]]);
//!
//! let model = GenerativeModel::new(TagAlphabet::standard(), vocabulary, lexicon, bigrams);
//! let tagger = Tagger::new(model);
//!
//! let sentence = Sentence::from_text("John lives in Paris").unwrap();
//! let spans = tagger.entities(&sentence, &["0", "1", "2", "3"]).unwrap();
//!
//! assert_eq!(spans.get(EntityType::Person)[0].to_string(), "0-0");
//! assert_eq!(spans.get(EntityType::Location)[0].to_string(), "3-3");
//! ```
pub mod baseline;
pub mod chunk;
pub mod config;
pub mod decoder;
pub mod error;
pub mod lexicon;
pub mod model;
pub mod tags;

// Re-export primary API
pub use baseline::LookupTagger;
pub use chunk::{EntitySpans, Span, add_bio_prefixes, extract_spans, repair_bio, spans_from_tags};
pub use config::TaggerConfig;
pub use decoder::{Tagger, Trellis, ViterbiDecoder};
pub use error::{Result, TagError};
pub use lexicon::{
    BigramCounts, FoldedVocabulary, Lexicon, TagContext, UNKNOWN_WORD, UnknownWordPolicy,
    Vocabulary,
};
pub use model::{
    DiscriminativeModel, Distribution, FeatureBundle, FeatureKey, FeatureKind, GenerativeModel,
    LabeledFeatures, ProbabilityModel, Scorer, ScorerTrainer, Sentence,
};
pub use tags::{BioTag, EntityType, Tag, TagAlphabet, parse_bio};
