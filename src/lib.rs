//! Training-support utilities for flood-forecasting models: an early-stopping
//! guard with best-model checkpointing, and preprocessing helpers for tabular
//! time-series data.

pub mod checkpoint;
pub mod early_stopping;
pub mod error;
pub mod preprocessing;

pub use checkpoint::{Checkpointable, ModelCheckpoint};
pub use early_stopping::{EarlyStopper, EarlyStoppingConfig};
pub use error::{Error, Result};
