//! Lookup baseline: every token gets the BIO tag it carried most recently in
//! training, unseen tokens get `O`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chunk::{EntitySpans, extract_spans, repair_bio};
use crate::error::{Result, TagError};
use crate::model::Sentence;
use crate::tags::BioTag;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupTagger {
    table: HashMap<String, BioTag>,
}

impl LookupTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one labeled sentence. Later sentences overwrite earlier tags.
    pub fn observe<S: AsRef<str>>(&mut self, tokens: &[S], tags: &[BioTag]) -> Result<()> {
        if tokens.len() != tags.len() {
            return Err(TagError::LengthMismatch {
                left: "tokens",
                left_len: tokens.len(),
                right: "bio tags",
                right_len: tags.len(),
            });
        }
        for (token, &tag) in tokens.iter().zip(tags) {
            self.table.insert(token.as_ref().to_string(), tag);
        }
        Ok(())
    }

    pub fn lookup(&self, token: &str) -> BioTag {
        self.table.get(token).copied().unwrap_or(BioTag::Outside)
    }

    /// Repaired BIO tags for `sentence`.
    pub fn assign_bio(&self, sentence: &Sentence) -> Vec<BioTag> {
        let mut tags: Vec<BioTag> = sentence.tokens().iter().map(|t| self.lookup(t)).collect();
        repair_bio(&mut tags);
        tags
    }

    pub fn entities<S: AsRef<str>>(
        &self,
        sentence: &Sentence,
        indexes: &[S],
    ) -> Result<EntitySpans> {
        extract_spans(&self.assign_bio(sentence), indexes)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
