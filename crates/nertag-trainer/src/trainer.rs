//! Model construction, evaluation and prediction pipelines.

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::info;

use nertag_core::{
    BioTag, DiscriminativeModel, EntitySpans, GenerativeModel, LookupTagger, Sentence, TagAlphabet,
    Tagger, TaggerConfig,
};

use crate::data::{self, IndexedSentence, LabeledSentence};
use crate::evaluation::Evaluation;
use crate::maxent::{GisTrainer, MaxentClassifier};

/// Which tagger to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    /// Bigram HMM with a frequency lexicon
    Hmm,
    /// Maximum-entropy Markov model
    Memm,
    /// Last-seen-tag lookup
    Baseline,
}

/// A tagger ready to label sentences.
pub enum TrainedTagger {
    Hmm(Tagger<GenerativeModel>),
    Memm(Tagger<DiscriminativeModel<MaxentClassifier>>),
    Baseline(LookupTagger),
}

impl TrainedTagger {
    pub fn kind(&self) -> ModelKind {
        match self {
            TrainedTagger::Hmm(_) => ModelKind::Hmm,
            TrainedTagger::Memm(_) => ModelKind::Memm,
            TrainedTagger::Baseline(_) => ModelKind::Baseline,
        }
    }

    /// Repaired BIO tags for `sentence`.
    pub fn assign_bio(&self, sentence: &Sentence) -> Result<Vec<BioTag>> {
        Ok(match self {
            TrainedTagger::Hmm(tagger) => tagger.assign_bio(sentence)?,
            TrainedTagger::Memm(tagger) => tagger.assign_bio(sentence)?,
            TrainedTagger::Baseline(tagger) => tagger.assign_bio(sentence),
        })
    }

    pub fn entities(&self, sentence: &Sentence, indexes: &[String]) -> Result<EntitySpans> {
        Ok(match self {
            TrainedTagger::Hmm(tagger) => tagger.entities(sentence, indexes)?,
            TrainedTagger::Memm(tagger) => tagger.entities(sentence, indexes)?,
            TrainedTagger::Baseline(tagger) => tagger.entities(sentence, indexes)?,
        })
    }
}

/// Build the HMM from a labeled corpus, folding rare words per `config`.
pub fn build_hmm(
    corpus: &[LabeledSentence],
    config: &TaggerConfig,
) -> Result<Tagger<GenerativeModel>> {
    let policy = config.unknown_policy()?;
    let model = GenerativeModel::build(
        TagAlphabet::standard(),
        &data::vocabulary(corpus),
        &data::lexicon(corpus),
        data::bigram_counts(corpus),
        &policy,
    );
    info!(
        vocabulary = model.vocabulary().len(),
        unknown = model.unknown_words().len(),
        "built hmm"
    );
    Ok(Tagger::new(model))
}

/// Train a maximum-entropy scorer on the corpus's feature bundles.
pub fn train_maxent(corpus: &[LabeledSentence], config: &TaggerConfig) -> Result<MaxentClassifier> {
    let model = train_memm_model(corpus, config)?;
    Ok(model.scorer().clone())
}

fn train_memm_model(
    corpus: &[LabeledSentence],
    config: &TaggerConfig,
) -> Result<DiscriminativeModel<MaxentClassifier>> {
    let features = data::feature_corpus(corpus)?;
    DiscriminativeModel::train(
        TagAlphabet::standard(),
        &features,
        config.maxent_iterations,
        &GisTrainer::new(),
    )
    .context("failed to train maxent scorer")
}

/// Build the MEMM, reusing `pretrained` when given.
pub fn build_memm(
    corpus: &[LabeledSentence],
    config: &TaggerConfig,
    pretrained: Option<MaxentClassifier>,
) -> Result<Tagger<DiscriminativeModel<MaxentClassifier>>> {
    let model = match pretrained {
        Some(scorer) => {
            info!(features = scorer.num_features(), "using pretrained maxent scorer");
            DiscriminativeModel::new(TagAlphabet::standard(), scorer)
        }
        None => train_memm_model(corpus, config)?,
    };
    Ok(Tagger::new(model))
}

/// Build the tagger selected by `kind`.
pub fn build(
    kind: ModelKind,
    corpus: &[LabeledSentence],
    config: &TaggerConfig,
    pretrained: Option<MaxentClassifier>,
) -> Result<TrainedTagger> {
    config.validate()?;
    info!(?kind, sentences = corpus.len(), "building tagger");
    Ok(match kind {
        ModelKind::Hmm => TrainedTagger::Hmm(build_hmm(corpus, config)?),
        ModelKind::Memm => TrainedTagger::Memm(build_memm(corpus, config, pretrained)?),
        ModelKind::Baseline => TrainedTagger::Baseline(data::lookup_tagger(corpus)?),
    })
}

/// Token accuracy of `tagger` on a gold corpus.
pub fn evaluate(tagger: &TrainedTagger, gold: &[LabeledSentence]) -> Result<Evaluation> {
    let mut eval = Evaluation::new();
    for (i, example) in gold.iter().enumerate() {
        let predicted = tagger
            .assign_bio(&example.sentence)
            .with_context(|| format!("failed to tag sentence {}", i + 1))?;
        eval.accumulate(&example.labels, &predicted)?;
    }
    info!(
        kind = ?tagger.kind(),
        correct = eval.correct(),
        total = eval.total(),
        accuracy = eval.accuracy(),
        "evaluation finished"
    );
    Ok(eval)
}

/// Entity spans over every sentence of a test corpus.
pub fn predict(tagger: &TrainedTagger, test: &[IndexedSentence]) -> Result<EntitySpans> {
    let mut spans = EntitySpans::new();
    for (i, example) in test.iter().enumerate() {
        let found = tagger
            .entities(&example.sentence, &example.indexes)
            .with_context(|| format!("failed to tag sentence {}", i + 1))?;
        spans.extend(found);
    }
    info!(kind = ?tagger.kind(), entities = spans.len(), "prediction finished");
    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{read_corpus, read_test_corpus};
    use nertag_core::EntityType;

    const TRAIN: &str = "\
John lives in Paris
NNP VBZ IN NNP
B-PER O O B-LOC
Mary works in London
NNP VBZ IN NNP
B-PER O O B-LOC
Acme sells Euro bonds
NNP VBZ NNP NNS
B-ORG O B-MISC O
";

    const TEST: &str = "\
Mary lives in Paris
NNP VBZ IN NNP
20 21 22 23
";

    fn corpus() -> Vec<LabeledSentence> {
        read_corpus(TRAIN.as_bytes()).unwrap()
    }

    #[test]
    fn test_hmm_evaluation() {
        let corpus = corpus();
        let tagger = build(ModelKind::Hmm, &corpus, &TaggerConfig::default(), None).unwrap();
        let eval = evaluate(&tagger, &corpus).unwrap();
        assert_eq!(eval.total(), 12);
        // every singleton is folded, so the ORG-initial sentence is ambiguous
        assert!(eval.accuracy() > 0.9);
        assert_eq!(eval.label("B-LOC").unwrap().recall(), 1.0);
    }

    #[test]
    fn test_hmm_predicts_spans() {
        let corpus = corpus();
        let tagger = build(ModelKind::Hmm, &corpus, &TaggerConfig::default(), None).unwrap();
        let test = read_test_corpus(TEST.as_bytes()).unwrap();

        let spans = predict(&tagger, &test).unwrap();
        assert_eq!(spans.get(EntityType::Person)[0].to_string(), "20-20");
        assert_eq!(spans.get(EntityType::Location)[0].to_string(), "23-23");
    }

    #[test]
    fn test_memm_fits_training_data() {
        let corpus = corpus();
        let config = TaggerConfig::default().with_maxent_iterations(30);
        let tagger = build(ModelKind::Memm, &corpus, &config, None).unwrap();
        assert_eq!(tagger.kind(), ModelKind::Memm);

        let sentence = &corpus[0].sentence;
        let tags: Vec<String> = tagger
            .assign_bio(sentence)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(tags, vec!["B-PER", "O", "O", "B-LOC"]);
    }

    #[test]
    fn test_memm_reuses_pretrained_scorer() {
        let corpus = corpus();
        let config = TaggerConfig::default().with_maxent_iterations(3);
        let scorer = train_maxent(&corpus, &config).unwrap();
        let features = scorer.num_features();

        let tagger = build_memm(&[], &config, Some(scorer)).unwrap();
        assert_eq!(tagger.model().scorer().num_features(), features);
    }

    #[test]
    fn test_baseline() {
        let corpus = corpus();
        let tagger = build(ModelKind::Baseline, &corpus, &TaggerConfig::default(), None).unwrap();
        let eval = evaluate(&tagger, &corpus).unwrap();
        assert_eq!(eval.accuracy(), 1.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TaggerConfig::default().with_unknown_cap(0);
        assert!(build(ModelKind::Hmm, &corpus(), &config, None).is_err());
    }
}
