//! # Viterbi Decoding
//!
//! Finds the most probable tag path for a sentence under any
//! [`ProbabilityModel`], filling a probability matrix and a backpointer
//! matrix indexed `[tag][position]`.

use tracing::trace;

use crate::error::{Result, TagError};
use crate::model::{ProbabilityModel, Sentence};
use crate::tags::{Tag, TagAlphabet};

/// Dynamic-programming tables for one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct Trellis {
    prob: Vec<Vec<f64>>,
    backpointer: Vec<Vec<usize>>,
}

impl Trellis {
    fn new(num_tags: usize, len: usize) -> Self {
        Self {
            prob: vec![vec![0.0; len]; num_tags],
            backpointer: vec![vec![0; len]; num_tags],
        }
    }

    /// Best path probability ending in `tag` at `position`.
    pub fn prob(&self, tag: usize, position: usize) -> f64 {
        self.prob[tag][position]
    }

    /// Predecessor of `tag` at `position` on its best path.
    pub fn backpointer(&self, tag: usize, position: usize) -> usize {
        self.backpointer[tag][position]
    }

    pub fn num_tags(&self) -> usize {
        self.prob.len()
    }

    pub fn len(&self) -> usize {
        self.prob.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Argmax of the last column, then follow backpointers to position 0.
    pub fn best_path(&self) -> Vec<usize> {
        let len = self.len();
        if len == 0 {
            return Vec::new();
        }

        let column: Vec<f64> = self.prob.iter().map(|row| row[len - 1]).collect();
        let mut tag = argmax(&column).0;
        let mut path = vec![tag];
        for pos in (1..len).rev() {
            tag = self.backpointer[tag][pos];
            path.push(tag);
        }
        path.reverse();
        path
    }
}

/// Viterbi decoder bound to a tag alphabet.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder {
    alphabet: TagAlphabet,
}

impl ViterbiDecoder {
    pub fn new(alphabet: TagAlphabet) -> Self {
        Self { alphabet }
    }

    pub fn alphabet(&self) -> &TagAlphabet {
        &self.alphabet
    }

    /// Fill the probability and backpointer matrices for `sentence`.
    ///
    /// # Errors
    /// `TagError::AlphabetMismatch` if `model` uses a different alphabet,
    /// otherwise whatever the model reports for this sentence.
    pub fn trellis<M>(&self, model: &M, sentence: &Sentence) -> Result<Trellis>
    where
        M: ProbabilityModel + ?Sized,
    {
        self.check_alphabet(model.alphabet())?;

        let k = self.alphabet.len();
        let len = sentence.len();
        let mut trellis = Trellis::new(k, len);

        let start = self.checked(model.start_scores(sentence)?)?;
        let emission = self.checked(model.emission_scores(sentence, 0)?)?;
        for t in 0..k {
            trellis.prob[t][0] = start[t] * emission[t];
        }

        let mut steps: Vec<Vec<f64>> = Vec::with_capacity(k);
        for i in 1..len {
            steps.clear();
            for p in 0..k {
                steps.push(self.checked(model.step_scores(sentence, i, p)?)?);
            }
            let emission = self.checked(model.emission_scores(sentence, i)?)?;

            for t in 0..k {
                let candidates: Vec<f64> =
                    (0..k).map(|p| trellis.prob[p][i - 1] * steps[p][t]).collect();
                let (best_prev, best) = argmax(&candidates);
                trellis.prob[t][i] = best * emission[t];
                trellis.backpointer[t][i] = best_prev;
            }
        }

        trace!(tokens = len, tags = k, "filled trellis");
        Ok(trellis)
    }

    /// Most probable path as alphabet indices, one per token.
    pub fn decode<M>(&self, model: &M, sentence: &Sentence) -> Result<Vec<usize>>
    where
        M: ProbabilityModel + ?Sized,
    {
        Ok(self.trellis(model, sentence)?.best_path())
    }

    /// Most probable path as flat tags.
    pub fn assign_tags<M>(&self, model: &M, sentence: &Sentence) -> Result<Vec<Tag>>
    where
        M: ProbabilityModel + ?Sized,
    {
        let path = self.decode(model, sentence)?;
        self.alphabet.decode(&path)
    }

    fn check_alphabet(&self, other: &TagAlphabet) -> Result<()> {
        if *other != self.alphabet {
            return Err(TagError::AlphabetMismatch {
                decoder: self.alphabet.to_string(),
                model: other.to_string(),
            });
        }
        Ok(())
    }

    fn checked(&self, row: Vec<f64>) -> Result<Vec<f64>> {
        if row.len() != self.alphabet.len() {
            return Err(TagError::LengthMismatch {
                left: "score row",
                left_len: row.len(),
                right: "tag alphabet",
                right_len: self.alphabet.len(),
            });
        }
        Ok(row)
    }
}

/// Index and value of the first maximum; index 0 for an all-zero row.
fn argmax(values: &[f64]) -> (usize, f64) {
    let mut best = (0, values.first().copied().unwrap_or(0.0));
    for (idx, &value) in values.iter().enumerate().skip(1) {
        if value > best.1 {
            best = (idx, value);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{BigramCounts, Lexicon, Vocabulary};
    use crate::model::GenerativeModel;

    /// Fixed rows, independent of the sentence.
    struct TableModel {
        alphabet: TagAlphabet,
        start: Vec<f64>,
        step: Vec<Vec<f64>>,
    }

    impl ProbabilityModel for TableModel {
        fn alphabet(&self) -> &TagAlphabet {
            &self.alphabet
        }

        fn start_scores(&self, _sentence: &Sentence) -> Result<Vec<f64>> {
            Ok(self.start.clone())
        }

        fn step_scores(
            &self,
            _sentence: &Sentence,
            _position: usize,
            prev: usize,
        ) -> Result<Vec<f64>> {
            Ok(self.step[prev].clone())
        }
    }

    fn uniform_steps(k: usize) -> Vec<Vec<f64>> {
        vec![vec![1.0 / k as f64; k]; k]
    }

    fn training_model() -> GenerativeModel {
        let corpus: [(&[&str], &[Tag]); 3] = [
            (
                &["John", "lives", "in", "Paris"],
                &[Tag::Person, Tag::Outside, Tag::Outside, Tag::Location],
            ),
            (
                &["Mary", "works", "in", "London"],
                &[Tag::Person, Tag::Outside, Tag::Outside, Tag::Location],
            ),
            (
                &["Acme", "sells", "Euro", "bonds"],
                &[Tag::Organization, Tag::Outside, Tag::Miscellaneous, Tag::Outside],
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
        GenerativeModel::new(TagAlphabet::standard(), vocabulary, lexicon, bigrams)
    }

    #[test]
    fn test_single_token_takes_start_argmax() {
        let model = TableModel {
            alphabet: TagAlphabet::standard(),
            start: vec![0.1, 0.2, 0.6, 0.05, 0.05],
            step: uniform_steps(5),
        };
        let decoder = ViterbiDecoder::new(TagAlphabet::standard());
        let sentence = Sentence::from_text("Paris").unwrap();

        let tags = decoder.assign_tags(&model, &sentence).unwrap();
        assert_eq!(tags, vec![Tag::Location]);
    }

    #[test]
    fn test_path_length_matches_sentence() {
        let model = TableModel {
            alphabet: TagAlphabet::standard(),
            start: vec![0.2; 5],
            step: uniform_steps(5),
        };
        let decoder = ViterbiDecoder::new(TagAlphabet::standard());
        for text in ["a", "a b", "a b c d e f g h"] {
            let sentence = Sentence::from_text(text).unwrap();
            let path = decoder.decode(&model, &sentence).unwrap();
            assert_eq!(path.len(), sentence.len());
        }
    }

    #[test]
    fn test_ties_and_zero_rows_pick_lowest_index() {
        let model = TableModel {
            alphabet: TagAlphabet::standard(),
            start: vec![0.0; 5],
            step: vec![vec![0.0; 5]; 5],
        };
        let decoder = ViterbiDecoder::new(TagAlphabet::standard());
        let sentence = Sentence::from_text("x y z").unwrap();
        assert_eq!(decoder.decode(&model, &sentence).unwrap(), vec![0, 0, 0]);

        let tied = TableModel {
            alphabet: TagAlphabet::standard(),
            start: vec![0.0, 0.5, 0.5, 0.0, 0.0],
            step: uniform_steps(5),
        };
        assert_eq!(decoder.decode(&tied, &sentence).unwrap()[0], 1);
    }

    #[test]
    fn test_backpointers_follow_transitions() {
        // O -> PER is the only way to reach PER at position 1
        let mut step = vec![vec![0.0; 5]; 5];
        step[0] = vec![0.1, 0.9, 0.0, 0.0, 0.0];
        step[1] = vec![1.0, 0.0, 0.0, 0.0, 0.0];
        let model = TableModel {
            alphabet: TagAlphabet::standard(),
            start: vec![0.4, 0.6, 0.0, 0.0, 0.0],
            step,
        };
        let decoder = ViterbiDecoder::new(TagAlphabet::standard());
        let sentence = Sentence::from_text("a b").unwrap();

        let trellis = decoder.trellis(&model, &sentence).unwrap();
        assert_eq!(trellis.backpointer(1, 1), 0);
        assert!((trellis.prob(1, 1) - 0.36).abs() < 1e-12);
        assert!((trellis.prob(0, 1) - 0.6).abs() < 1e-12);
        assert_eq!(trellis.best_path(), vec![1, 0]);
    }

    #[test]
    fn test_generative_scenario() {
        let model = training_model();
        let decoder = ViterbiDecoder::new(TagAlphabet::standard());
        let sentence = Sentence::from_text("John lives in Paris").unwrap();

        let tags = decoder.assign_tags(&model, &sentence).unwrap();
        assert_eq!(
            tags,
            vec![Tag::Person, Tag::Outside, Tag::Outside, Tag::Location]
        );
    }

    #[test]
    fn test_alphabet_mismatch() {
        let model = training_model();
        let reordered = TagAlphabet::new(vec![
            Tag::Person,
            Tag::Outside,
            Tag::Location,
            Tag::Organization,
            Tag::Miscellaneous,
        ])
        .unwrap();
        let decoder = ViterbiDecoder::new(reordered);
        let sentence = Sentence::from_text("John").unwrap();

        let err = decoder.decode(&model, &sentence).unwrap_err();
        assert!(matches!(err, TagError::AlphabetMismatch { .. }));
    }

    #[test]
    fn test_unseen_context_surfaces() {
        let bigrams = BigramCounts::from_sequences([&[Tag::Outside, Tag::Person][..]]);
        let model = GenerativeModel::new(
            TagAlphabet::standard(),
            Vocabulary::new(),
            Lexicon::new(),
            bigrams,
        );
        let decoder = ViterbiDecoder::new(TagAlphabet::standard());
        let sentence = Sentence::from_text("a b").unwrap();

        let err = decoder.decode(&model, &sentence).unwrap_err();
        assert!(err.is_data_error());
    }
}
