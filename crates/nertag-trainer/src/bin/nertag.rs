//! Nertag command-line interface
//!
//! Trains a tagger on a labeled corpus, then either scores it against a gold
//! corpus or writes span predictions for a test corpus.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nertag_core::TaggerConfig;
use nertag_core::config::DEFAULT_MAXENT_ITERATIONS;
use nertag_core::lexicon::DEFAULT_UNKNOWN_CAP;
use nertag_trainer::{
    MaxentClassifier, ModelKind, build, evaluate, load_corpus, load_test_corpus, predict,
    save_predictions, trainer,
};

/// CLI arguments
#[derive(Parser)]
#[command(name = "nertag")]
#[command(about = "Train and run HMM, MEMM and baseline named-entity taggers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum number of rare words folded into <UNK>
    #[arg(long, global = true, env = "NERTAG_UNKNOWN_CAP", default_value_t = DEFAULT_UNKNOWN_CAP)]
    unknown_cap: usize,

    /// Optimizer iterations for the maxent scorer
    #[arg(
        long,
        global = true,
        env = "NERTAG_ITERATIONS",
        default_value_t = DEFAULT_MAXENT_ITERATIONS
    )]
    iterations: usize,

    /// Reuse a saved maxent scorer instead of training one
    #[arg(long, global = true, env = "NERTAG_MAXENT_MODEL")]
    maxent_model: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a tagger against a gold corpus
    Evaluate {
        /// Tagger to build
        #[arg(short, long, value_enum, default_value_t = ModelKind::Hmm)]
        model: ModelKind,
        /// Labeled training corpus
        #[arg(long)]
        train: PathBuf,
        /// Labeled gold corpus
        #[arg(long)]
        test: PathBuf,
    },
    /// Write entity span predictions as CSV
    Predict {
        /// Tagger to build
        #[arg(short, long, value_enum, default_value_t = ModelKind::Hmm)]
        model: ModelKind,
        /// Labeled training corpus
        #[arg(long)]
        train: PathBuf,
        /// Test corpus with token indexes
        #[arg(long)]
        test: PathBuf,
        /// CSV output path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Train a maxent scorer and save it as JSON
    TrainMaxent {
        /// Labeled training corpus
        #[arg(long)]
        train: PathBuf,
        /// JSON output path
        #[arg(short, long)]
        output: PathBuf,
    },
}

impl Cli {
    fn config(&self) -> TaggerConfig {
        TaggerConfig::new()
            .with_unknown_cap(self.unknown_cap)
            .with_maxent_iterations(self.iterations)
    }

    fn pretrained(&self, model: ModelKind) -> Result<Option<MaxentClassifier>> {
        match (&self.maxent_model, model) {
            (Some(path), ModelKind::Memm) => Ok(Some(MaxentClassifier::load(path)?)),
            _ => Ok(None),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    config.validate()?;

    match &cli.command {
        Commands::Evaluate { model, train, test } => {
            let corpus = load_corpus(train)?;
            let gold = load_corpus(test)?;
            let tagger = build(*model, &corpus, &config, cli.pretrained(*model)?)?;
            let eval = evaluate(&tagger, &gold)?;
            println!("{}", eval);
        }
        Commands::Predict {
            model,
            train,
            test,
            output,
        } => {
            let corpus = load_corpus(train)?;
            let sentences = load_test_corpus(test)?;
            let tagger = build(*model, &corpus, &config, cli.pretrained(*model)?)?;
            let spans = predict(&tagger, &sentences)?;
            save_predictions(output, &spans)?;
        }
        Commands::TrainMaxent { train, output } => {
            let corpus = load_corpus(train)?;
            let scorer = trainer::train_maxent(&corpus, &config)?;
            scorer.save(output)?;
            info!(output = %output.display(), "maxent scorer ready");
        }
    }

    Ok(())
}
