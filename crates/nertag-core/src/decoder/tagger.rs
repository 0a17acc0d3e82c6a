//! # Tagger
//!
//! Pairs a probability model with a decoder over the same alphabet and runs
//! the full path from tokens to entity spans.

use tracing::debug;

use crate::chunk::{EntitySpans, add_bio_prefixes, extract_spans, repair_bio};
use crate::decoder::viterbi::ViterbiDecoder;
use crate::error::Result;
use crate::model::{ProbabilityModel, Sentence};
use crate::tags::{BioTag, Tag};

/// A model bound to a decoder built from the model's own alphabet.
pub struct Tagger<M> {
    model: M,
    decoder: ViterbiDecoder,
}

impl<M: ProbabilityModel> Tagger<M> {
    pub fn new(model: M) -> Self {
        let decoder = ViterbiDecoder::new(model.alphabet().clone());
        Self { model, decoder }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn decoder(&self) -> &ViterbiDecoder {
        &self.decoder
    }

    /// Flat tags, one per token.
    pub fn assign_tags(&self, sentence: &Sentence) -> Result<Vec<Tag>> {
        self.decoder.assign_tags(&self.model, sentence)
    }

    /// BIO tags: prefixed, then repaired.
    pub fn assign_bio(&self, sentence: &Sentence) -> Result<Vec<BioTag>> {
        let tags = self.assign_tags(sentence)?;
        let mut bio = add_bio_prefixes(&tags);
        repair_bio(&mut bio);
        Ok(bio)
    }

    /// Entity spans over `indexes`, which must be parallel to the tokens.
    pub fn entities<S: AsRef<str>>(
        &self,
        sentence: &Sentence,
        indexes: &[S],
    ) -> Result<EntitySpans> {
        let bio = self.assign_bio(sentence)?;
        let spans = extract_spans(&bio, indexes)?;
        debug!(tokens = sentence.len(), entities = spans.len(), "tagged sentence");
        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{BigramCounts, Lexicon, Vocabulary};
    use crate::model::GenerativeModel;
    use crate::tags::{EntityType, TagAlphabet};

    fn tagger() -> Tagger<GenerativeModel> {
        let corpus: [(&[&str], &[Tag]); 2] = [
            (
                &["Ada", "Lovelace", "met", "Acme"],
                &[Tag::Person, Tag::Person, Tag::Outside, Tag::Organization],
            ),
            (
                &["in", "Rome", "at", "Expo"],
                &[Tag::Outside, Tag::Location, Tag::Outside, Tag::Miscellaneous],
            ),
        ];
        let mut vocabulary = Vocabulary::new();
        let mut lexicon = Lexicon::new();
        let mut bigrams = BigramCounts::new();
        for (words, tags) in corpus {
            for (word, &tag) in words.iter().zip(tags) {
                vocabulary.observe(word);
                lexicon.observe(tag, word);
            }
            bigrams.observe_sequence(tags);
        }
        Tagger::new(GenerativeModel::new(
            TagAlphabet::standard(),
            vocabulary,
            lexicon,
            bigrams,
        ))
    }

    #[test]
    fn test_assign_bio_merges_runs() {
        let tagger = tagger();
        let sentence = Sentence::from_text("Ada Lovelace met Acme").unwrap();
        let bio: Vec<String> = tagger
            .assign_bio(&sentence)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(bio, vec!["B-PER", "I-PER", "O", "B-ORG"]);
    }

    #[test]
    fn test_entities() {
        let tagger = tagger();
        let sentence = Sentence::from_text("Ada Lovelace met Acme").unwrap();
        let spans = tagger.entities(&sentence, &["4", "5", "6", "7"]).unwrap();
        assert_eq!(spans.get(EntityType::Person)[0].to_string(), "4-5");
        assert_eq!(spans.get(EntityType::Organization)[0].to_string(), "7-7");
        assert!(spans.get(EntityType::Location).is_empty());
    }
}
