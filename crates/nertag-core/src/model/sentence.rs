use crate::error::{Result, TagError};

/// A tokenized sentence, optionally with parallel part-of-speech tags.
///
/// Construction guarantees the sentence is non-empty and that POS tags, when
/// present, line up one-to-one with tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    tokens: Vec<String>,
    pos: Option<Vec<String>>,
}

impl Sentence {
    /// # Errors
    /// Returns `TagError::EmptySentence` if `tokens` is empty.
    pub fn new(tokens: Vec<String>) -> Result<Self> {
        if tokens.is_empty() {
            return Err(TagError::EmptySentence);
        }
        Ok(Self { tokens, pos: None })
    }

    /// # Errors
    /// Returns `TagError::EmptySentence` or `TagError::LengthMismatch`.
    pub fn with_pos(tokens: Vec<String>, pos: Vec<String>) -> Result<Self> {
        if tokens.is_empty() {
            return Err(TagError::EmptySentence);
        }
        if tokens.len() != pos.len() {
            return Err(TagError::LengthMismatch {
                left: "tokens",
                left_len: tokens.len(),
                right: "pos tags",
                right_len: pos.len(),
            });
        }
        Ok(Self {
            tokens,
            pos: Some(pos),
        })
    }

    /// Split a line on whitespace.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(split(text))
    }

    /// Split a token line and a POS line on whitespace.
    pub fn from_text_with_pos(text: &str, pos: &str) -> Result<Self> {
        Self::with_pos(split(text), split(pos))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Token at `position`.
    ///
    /// # Errors
    /// Returns `TagError::PositionOutOfRange` past the end of the sentence.
    pub fn token(&self, position: usize) -> Result<&str> {
        self.tokens
            .get(position)
            .map(String::as_str)
            .ok_or(TagError::PositionOutOfRange {
                position,
                len: self.tokens.len(),
            })
    }

    pub fn pos(&self) -> Option<&[String]> {
        self.pos.as_deref()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false: empty sentences cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// POS tags, or `TagError::MissingPos`.
    pub fn require_pos(&self) -> Result<&[String]> {
        self.pos().ok_or(TagError::MissingPos)
    }
}

fn split(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        let sentence = Sentence::from_text("  John lives in Paris \n").unwrap();
        assert_eq!(sentence.len(), 4);
        assert_eq!(sentence.tokens()[3], "Paris");
        assert!(sentence.pos().is_none());
        assert!(matches!(sentence.require_pos(), Err(TagError::MissingPos)));
    }

    #[test]
    fn test_empty_sentence() {
        assert!(matches!(Sentence::from_text("   "), Err(TagError::EmptySentence)));
        assert!(matches!(
            Sentence::with_pos(vec![], vec![]),
            Err(TagError::EmptySentence)
        ));
    }

    #[test]
    fn test_token_out_of_range() {
        let sentence = Sentence::from_text("John lives").unwrap();
        assert_eq!(sentence.token(1).unwrap(), "lives");
        let err = sentence.token(2).unwrap_err();
        assert!(err.is_input_error());
        assert!(matches!(err, TagError::PositionOutOfRange { position: 2, len: 2 }));
    }

    #[test]
    fn test_pos_length_mismatch() {
        let err = Sentence::from_text_with_pos("John lives", "NNP").unwrap_err();
        assert!(err.is_input_error());
        assert!(matches!(err, TagError::LengthMismatch { left_len: 2, right_len: 1, .. }));
    }
}
