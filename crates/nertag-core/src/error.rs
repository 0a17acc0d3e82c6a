use thiserror::Error;

/// Errors that can occur while building models or tagging sentences.
#[derive(Debug, Error)]
pub enum TagError {
    /// The sentence has no tokens.
    #[error("sentence is empty")]
    EmptySentence,

    /// Two sequences that must be parallel have different lengths.
    #[error("length mismatch: {left} {left_len} vs {right} {right_len}")]
    LengthMismatch {
        /// Name of the first sequence.
        left: &'static str,
        /// Length of the first sequence.
        left_len: usize,
        /// Name of the second sequence.
        right: &'static str,
        /// Length of the second sequence.
        right_len: usize,
    },

    /// A token position past the end of the sentence.
    #[error("position {position} is out of range for a sentence of {len} tokens")]
    PositionOutOfRange {
        /// Requested position.
        position: usize,
        /// Sentence length.
        len: usize,
    },

    /// The model needs part-of-speech tags but none were supplied.
    #[error("part-of-speech tags are required by this model")]
    MissingPos,

    /// A tag or BIO tag string could not be parsed.
    #[error("invalid tag: {0:?}")]
    InvalidTag(String),

    /// A probability was requested for a context never seen in training.
    #[error("no training data for {0}")]
    UnseenContext(String),

    /// A BIO sequence violates the span invariant after repair.
    #[error("inconsistent BIO sequence at position {position}: {tag} outside an open {tag_type} span")]
    Consistency {
        /// Index of the offending tag.
        position: usize,
        /// The offending tag, as written.
        tag: String,
        /// Entity type of the offending tag.
        tag_type: String,
    },

    /// A model and a decoder were built against different tag alphabets.
    #[error("tag alphabet mismatch: decoder has {decoder}, model has {model}")]
    AlphabetMismatch {
        /// The decoder's alphabet.
        decoder: String,
        /// The model's alphabet.
        model: String,
    },

    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TagError {
    /// Whether this error was caused by malformed caller input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            TagError::EmptySentence
                | TagError::LengthMismatch { .. }
                | TagError::PositionOutOfRange { .. }
                | TagError::MissingPos
                | TagError::InvalidTag(_)
        )
    }

    /// Whether this error was caused by gaps in the training data.
    pub fn is_data_error(&self) -> bool {
        matches!(self, TagError::UnseenContext(_))
    }
}

/// Result type alias for tagging operations.
pub type Result<T> = std::result::Result<T, TagError>;
