//! # Nertag
//!
//! Named-entity tagging over `O, PER, LOC, ORG, MISC`. Re-exports the models,
//! decoder and chunking of [`nertag_core`] together with the corpus, training
//! and reporting tools of [`nertag_trainer`].

pub use nertag_core::*;

pub mod trainer {
    pub use nertag_trainer::*;
}
