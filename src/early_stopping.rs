use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::checkpoint::{Checkpointable, ModelCheckpoint};
use crate::error::{Error, Result};

/// Configuration for the early-stopping guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarlyStoppingConfig {
    /// Number of consecutive non-improving evaluations tolerated before
    /// training is stopped.
    pub patience: usize,
    /// Minimum margin a score must exceed the best score by to count as an
    /// improvement.
    pub min_delta: f64,
    /// If true, the improvement margin is measured against the score at the
    /// last counter reset rather than the best score seen since.
    pub cumulative_delta: bool,
    /// Where the best-model checkpoint is written. Overwritten on every new
    /// best; no versioning.
    pub checkpoint_path: PathBuf,
}

impl Default for EarlyStoppingConfig {
    fn default() -> Self {
        Self {
            patience: 5,
            min_delta: 0.0,
            cumulative_delta: false,
            checkpoint_path: PathBuf::from("checkpoint.json"),
        }
    }
}

/// Early-stopping guard for a training loop.
///
/// Holds the best validation score and a patience counter across repeated
/// [`evaluate`](EarlyStopper::evaluate) calls, saving a checkpoint of the
/// model whenever a new best is recorded. One guard instance belongs to one
/// training loop; construct a fresh one per run.
#[derive(Debug)]
pub struct EarlyStopper {
    config: EarlyStoppingConfig,
    best_score: Option<f64>,
    counter: usize,
}

impl EarlyStopper {
    /// Creates a guard from the given configuration.
    ///
    /// # Errors
    /// `InvalidArgument` when `patience < 1` or `min_delta` is negative.
    pub fn new(config: EarlyStoppingConfig) -> Result<Self> {
        if config.patience < 1 {
            return Err(Error::InvalidArgument(
                "patience must be a positive integer".to_string(),
            ));
        }
        if !(config.min_delta >= 0.0) {
            return Err(Error::InvalidArgument(
                "min_delta must not be negative".to_string(),
            ));
        }

        Ok(Self {
            config,
            best_score: None,
            counter: 0,
        })
    }

    /// Decides whether training should continue after an evaluation epoch.
    ///
    /// Higher scores are better; callers minimizing a loss must negate it
    /// before calling. The model is checkpointed on the first call and on
    /// every sufficient improvement, i.e. a score above the best by more than
    /// `min_delta`. A score within `min_delta` of the best increments the
    /// patience counter; unless `cumulative_delta` is set, a score above the
    /// best still raises the best without resetting the counter.
    ///
    /// Returns `Ok(false)` once the counter reaches `patience`.
    ///
    /// # Errors
    /// Propagates checkpoint write failures; the guard's state is left as it
    /// was before the call.
    pub fn evaluate<M: Checkpointable>(
        &mut self,
        model: &M,
        validation_score: f64,
    ) -> Result<bool> {
        let best = match self.best_score {
            None => {
                self.record_best(model, validation_score)?;
                return Ok(true);
            }
            Some(best) => best,
        };

        if validation_score <= best + self.config.min_delta {
            if !self.config.cumulative_delta && validation_score > best {
                self.best_score = Some(validation_score);
            }
            self.counter += 1;
            log::debug!(
                "no sufficient improvement: counter {}/{}",
                self.counter,
                self.config.patience
            );
            if self.counter >= self.config.patience {
                log::info!(
                    "early stopping: no sufficient improvement in {} evaluations",
                    self.config.patience
                );
                return Ok(false);
            }
        } else {
            self.record_best(model, validation_score)?;
            self.counter = 0;
        }

        Ok(true)
    }

    fn record_best<M: Checkpointable>(&mut self, model: &M, score: f64) -> Result<()> {
        ModelCheckpoint::from_model(model).save(&self.config.checkpoint_path)?;
        self.best_score = Some(score);
        Ok(())
    }

    /// Best validation score seen so far, if any evaluation has run.
    pub fn best_score(&self) -> Option<f64> {
        self.best_score
    }

    /// Current patience counter value.
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Restores the freshly-constructed state.
    pub fn reset(&mut self) {
        self.best_score = None;
        self.counter = 0;
    }
}
