pub mod tagger;
pub mod viterbi;

pub use tagger::Tagger;
pub use viterbi::{Trellis, ViterbiDecoder};
