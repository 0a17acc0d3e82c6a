pub mod bigram;
pub mod table;
pub mod unknown;
pub mod vocabulary;

pub use bigram::{BigramCounts, TagContext};
pub use table::Lexicon;
pub use unknown::{DEFAULT_UNKNOWN_CAP, FoldedVocabulary, UnknownWordPolicy};
pub use vocabulary::{UNKNOWN_WORD, Vocabulary};
