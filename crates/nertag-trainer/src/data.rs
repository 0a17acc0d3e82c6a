//! Data loading for the three-line corpus format.
//!
//! Each sentence takes three lines: whitespace-separated tokens, their POS
//! tags, then either BIO tags (training data) or token indexes (test data).
//! Blank lines between groups are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, warn};

use nertag_core::{
    BigramCounts, BioTag, FeatureBundle, LabeledFeatures, Lexicon, LookupTagger, Sentence, Tag,
    Vocabulary, parse_bio,
};

/// A training sentence: tokens with POS tags and gold BIO labels.
#[derive(Debug, Clone)]
pub struct LabeledSentence {
    pub sentence: Sentence,
    pub labels: Vec<BioTag>,
}

impl LabeledSentence {
    pub fn tokens(&self) -> &[String] {
        self.sentence.tokens()
    }

    /// Gold labels with the BIO prefix stripped.
    pub fn tags(&self) -> Vec<Tag> {
        self.labels.iter().map(BioTag::tag).collect()
    }
}

/// A test sentence: tokens with POS tags and the index of each token.
#[derive(Debug, Clone)]
pub struct IndexedSentence {
    pub sentence: Sentence,
    pub indexes: Vec<String>,
}

/// Group non-blank lines into (tokens, pos, third) triples.
fn read_groups<R: BufRead>(reader: R) -> Result<Vec<(usize, [String; 3])>> {
    let mut groups = Vec::new();
    let mut pending: Vec<String> = Vec::with_capacity(3);
    let mut first_line = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if pending.is_empty() {
            first_line = idx + 1;
        }
        pending.push(line.to_string());
        if pending.len() == 3 {
            let group: [String; 3] = std::mem::take(&mut pending)
                .try_into()
                .map_err(|_| anyhow!("malformed sentence at line {}", first_line))?;
            groups.push((first_line, group));
        }
    }

    if !pending.is_empty() {
        bail!(
            "incomplete sentence starting at line {}: expected 3 lines, found {}",
            first_line,
            pending.len()
        );
    }
    Ok(groups)
}

/// Read a labeled corpus (tokens / POS / BIO tags).
pub fn read_corpus<R: BufRead>(reader: R) -> Result<Vec<LabeledSentence>> {
    let mut corpus = Vec::new();
    for (line, [tokens, pos, tags]) in read_groups(reader)? {
        let sentence = Sentence::from_text_with_pos(&tokens, &pos)
            .with_context(|| format!("invalid sentence at line {}", line))?;
        let raw: Vec<&str> = tags.split_whitespace().collect();
        if raw.len() != sentence.len() {
            bail!(
                "sentence at line {} has {} tokens but {} tags",
                line,
                sentence.len(),
                raw.len()
            );
        }
        let labels = parse_bio(&raw).with_context(|| format!("invalid tags at line {}", line + 2))?;
        corpus.push(LabeledSentence { sentence, labels });
    }
    Ok(corpus)
}

/// Read a test corpus (tokens / POS / indexes).
pub fn read_test_corpus<R: BufRead>(reader: R) -> Result<Vec<IndexedSentence>> {
    let mut corpus = Vec::new();
    for (line, [tokens, pos, indexes]) in read_groups(reader)? {
        let sentence = Sentence::from_text_with_pos(&tokens, &pos)
            .with_context(|| format!("invalid sentence at line {}", line))?;
        let indexes: Vec<String> = indexes.split_whitespace().map(str::to_string).collect();
        if indexes.len() != sentence.len() {
            bail!(
                "sentence at line {} has {} tokens but {} indexes",
                line,
                sentence.len(),
                indexes.len()
            );
        }
        corpus.push(IndexedSentence { sentence, indexes });
    }
    Ok(corpus)
}

fn open<P: AsRef<Path>>(path: P) -> Result<BufReader<File>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Load a labeled corpus from a file.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledSentence>> {
    let corpus = read_corpus(open(&path)?)
        .with_context(|| format!("failed to parse {}", path.as_ref().display()))?;
    if corpus.is_empty() {
        warn!(path = %path.as_ref().display(), "corpus is empty");
    }
    info!(sentences = corpus.len(), path = %path.as_ref().display(), "loaded corpus");
    Ok(corpus)
}

/// Load a test corpus from a file.
pub fn load_test_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<IndexedSentence>> {
    let corpus = read_test_corpus(open(&path)?)
        .with_context(|| format!("failed to parse {}", path.as_ref().display()))?;
    info!(sentences = corpus.len(), path = %path.as_ref().display(), "loaded test corpus");
    Ok(corpus)
}

/// Token frequencies in first-seen order.
pub fn vocabulary(corpus: &[LabeledSentence]) -> Vocabulary {
    let mut vocab = Vocabulary::new();
    for example in corpus {
        for token in example.tokens() {
            vocab.observe(token);
        }
    }
    vocab
}

/// Tag -> word counts with BIO prefixes stripped.
pub fn lexicon(corpus: &[LabeledSentence]) -> Lexicon {
    let mut lexicon = Lexicon::new();
    for example in corpus {
        for (token, label) in example.tokens().iter().zip(&example.labels) {
            lexicon.observe(label.tag(), token);
        }
    }
    lexicon
}

/// Tag bigram counts over the stripped gold labels.
pub fn bigram_counts(corpus: &[LabeledSentence]) -> BigramCounts {
    let mut counts = BigramCounts::new();
    for example in corpus {
        counts.observe_sequence(&example.tags());
    }
    counts
}

/// One feature bundle per token, conditioned on the previous gold tag.
pub fn feature_corpus(corpus: &[LabeledSentence]) -> Result<Vec<LabeledFeatures>> {
    let mut examples = Vec::new();
    for example in corpus {
        let tokens = example.tokens();
        let pos = example.sentence.require_pos()?;
        let tags = example.tags();
        for i in 0..tokens.len() {
            let bundle = if i == 0 {
                FeatureBundle::sentence_start(&tokens[0], &pos[0])
            } else {
                FeatureBundle::following(&tokens[i - 1], tags[i - 1], &tokens[i], &pos[i])
            };
            examples.push((bundle, tags[i]));
        }
    }
    Ok(examples)
}

/// Token -> last seen BIO label.
pub fn lookup_tagger(corpus: &[LabeledSentence]) -> Result<LookupTagger> {
    let mut tagger = LookupTagger::new();
    for example in corpus {
        tagger.observe(example.tokens(), &example.labels)?;
    }
    Ok(tagger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nertag_core::TagContext;

    const TRAIN: &str = "\
John lives in Paris
NNP VBZ IN NNP
B-PER O O B-LOC

New York Times
NNP NNP NNP
B-ORG I-ORG I-ORG
";

    const TEST: &str = "\
Mary left
NNP VBD
7 8
";

    #[test]
    fn test_read_corpus() {
        let corpus = read_corpus(TRAIN.as_bytes()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus[0].tokens()[3], "Paris");
        assert_eq!(corpus[0].sentence.pos().unwrap()[1], "VBZ");
        assert_eq!(corpus[1].tags(), vec![Tag::Organization; 3]);
        assert!(corpus[1].labels[1].is_inside());
    }

    #[test]
    fn test_read_test_corpus() {
        let corpus = read_test_corpus(TEST.as_bytes()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].indexes, vec!["7", "8"]);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let bad_tags = "a b\nDT NN\nO\n";
        assert!(read_corpus(bad_tags.as_bytes()).is_err());
        let bad_pos = "a b\nDT\nO O\n";
        assert!(read_corpus(bad_pos.as_bytes()).is_err());
        let bad_indexes = "a b\nDT NN\n0\n";
        assert!(read_test_corpus(bad_indexes.as_bytes()).is_err());
    }

    #[test]
    fn test_incomplete_group_rejected() {
        let err = read_corpus("a b\nDT NN\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("incomplete sentence"));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert!(read_corpus("a\nDT\nB-FOO\n".as_bytes()).is_err());
    }

    #[test]
    fn test_builders() {
        let corpus = read_corpus(TRAIN.as_bytes()).unwrap();

        let vocab = vocabulary(&corpus);
        assert_eq!(vocab.len(), 7);
        assert_eq!(vocab.iter().next(), Some(("John", 1)));

        let lexicon = lexicon(&corpus);
        assert_eq!(lexicon.count(Tag::Organization, "York"), 1);
        assert_eq!(lexicon.count(Tag::Outside, "in"), 1);

        let bigrams = bigram_counts(&corpus);
        assert_eq!(bigrams.sentences(), 2);
        assert_eq!(bigrams.count(TagContext::Tag(Tag::Organization), Tag::Organization), 2);
    }

    #[test]
    fn test_feature_corpus() {
        let corpus = read_corpus(TRAIN.as_bytes()).unwrap();
        let features = feature_corpus(&corpus).unwrap();
        assert_eq!(features.len(), 7);

        let (first, tag) = &features[0];
        assert_eq!(*first, FeatureBundle::sentence_start("John", "NNP"));
        assert_eq!(*tag, Tag::Person);

        let (second, tag) = &features[1];
        assert_eq!(
            *second,
            FeatureBundle::following("John", Tag::Person, "lives", "VBZ")
        );
        assert_eq!(*tag, Tag::Outside);
    }

    #[test]
    fn test_lookup_tagger() {
        let corpus = read_corpus(TRAIN.as_bytes()).unwrap();
        let tagger = lookup_tagger(&corpus).unwrap();
        assert_eq!(tagger.lookup("York").to_string(), "I-ORG");
    }
}
