//! Builder-style configuration for model construction.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagError};
use crate::lexicon::{DEFAULT_UNKNOWN_CAP, UnknownWordPolicy};

/// Default optimizer iterations for the discriminative scorer.
pub const DEFAULT_MAXENT_ITERATIONS: usize = 10;

/// Configuration shared by the model builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Maximum number of rare words folded into `<UNK>`
    pub unknown_cap: usize,
    /// Frequency at which a word counts as rare
    pub unknown_frequency: u64,
    /// Iteration budget for scorer training
    pub maxent_iterations: usize,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            unknown_cap: DEFAULT_UNKNOWN_CAP,
            unknown_frequency: 1,
            maxent_iterations: DEFAULT_MAXENT_ITERATIONS,
        }
    }
}

impl TaggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unknown_cap(mut self, cap: usize) -> Self {
        self.unknown_cap = cap;
        self
    }

    pub fn with_unknown_frequency(mut self, frequency: u64) -> Self {
        self.unknown_frequency = frequency;
        self
    }

    pub fn with_maxent_iterations(mut self, iterations: usize) -> Self {
        self.maxent_iterations = iterations;
        self
    }

    /// # Errors
    /// Returns `TagError::InvalidConfig` for a zero cap, frequency or
    /// iteration count.
    pub fn validate(&self) -> Result<()> {
        self.unknown_policy()?;
        if self.maxent_iterations == 0 {
            return Err(TagError::InvalidConfig(
                "maxent iterations must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The unknown-word policy these settings describe.
    pub fn unknown_policy(&self) -> Result<UnknownWordPolicy> {
        UnknownWordPolicy::with_frequency(self.unknown_cap, self.unknown_frequency)
    }
}
