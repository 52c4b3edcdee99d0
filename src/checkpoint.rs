use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Models that can expose their parameters for checkpointing.
///
/// The state dictionary is opaque to everything in this crate: parameter
/// names map to flattened tensor data, and nothing here depends on the
/// model's architecture.
pub trait Checkpointable {
    /// Named parameter tensors, flattened to `f32` buffers.
    fn state_dict(&self) -> BTreeMap<String, Vec<f32>>;
}

/// Serialized model parameters as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCheckpoint {
    pub params: BTreeMap<String, Vec<f32>>,
}

impl ModelCheckpoint {
    /// Captures the model's current state dictionary.
    pub fn from_model<M: Checkpointable + ?Sized>(model: &M) -> Self {
        Self {
            params: model.state_dict(),
        }
    }

    /// Save the checkpoint, overwriting any previous file at `path`.
    ///
    /// The write is synchronous and blocks until the file is on disk. Parent
    /// directories are created as needed.
    ///
    /// # Errors
    /// Returns an error if directory creation or the file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| Error::Checkpoint {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::Checkpoint {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("checkpoint saved to {}", path.display());

        Ok(())
    }

    /// Load a checkpoint previously written by [`ModelCheckpoint::save`].
    ///
    /// # Errors
    /// Returns an error if the file is missing, unreadable, or not a valid
    /// checkpoint.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Checkpoint {
            path: path.to_path_buf(),
            source,
        })?;
        let checkpoint = serde_json::from_str(&json)?;
        Ok(checkpoint)
    }
}
