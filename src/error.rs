use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors surfaced by the training-support utilities.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied argument failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Checkpoint I/O failed. Fatal; the write is not retried.
    #[error("checkpoint I/O failed at {}: {source}", path.display())]
    Checkpoint {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Dataframe(#[from] PolarsError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
