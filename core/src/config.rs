// ## 📂 File: `src/config.rs`

//! Pipeline configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! blob_size = 2097152
//! workers = 4
//! inflight_units = 8
//! skip_existing_blobs = true
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{
    AES_BLOCK_LEN, BLOB_SIZE, DEFAULT_INFLIGHT_UNITS, DEFAULT_WORKERS, MAX_BLOB_SIZE, MAX_INFLIGHT_UNITS,
    MIN_BLOB_SIZE,
};
use crate::stream::parallelism::ParallelismProfile;
use crate::types::StreamError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Upper bound on one ciphertext blob, in bytes. Changing it changes stream hashes.
    pub blob_size: usize,
    pub workers: usize,
    /// Units allowed in each channel between pipeline stages.
    pub inflight_units: usize,
    /// Skip `put_blob` when the store already holds the blob.
    pub skip_existing_blobs: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            blob_size: BLOB_SIZE,
            workers: DEFAULT_WORKERS,
            inflight_units: DEFAULT_INFLIGHT_UNITS,
            skip_existing_blobs: true,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, StreamError> {
        let config: Self = toml::from_str(s).map_err(|e| StreamError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config sized to the current machine (see `ParallelismProfile::dynamic`).
    pub fn dynamic() -> Self {
        let profile = ParallelismProfile::dynamic(BLOB_SIZE as u64, 0.25, MAX_INFLIGHT_UNITS);
        Self {
            workers: profile.workers,
            inflight_units: profile.inflight_units,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.blob_size < MIN_BLOB_SIZE || self.blob_size > MAX_BLOB_SIZE {
            return Err(StreamError::Config(format!(
                "blob_size {} outside [{MIN_BLOB_SIZE}, {MAX_BLOB_SIZE}]",
                self.blob_size
            )));
        }
        if self.blob_size % AES_BLOCK_LEN != 0 {
            return Err(StreamError::Config(format!(
                "blob_size {} is not a multiple of {AES_BLOCK_LEN}",
                self.blob_size
            )));
        }
        if self.workers == 0 {
            return Err(StreamError::Config("workers must be > 0".into()));
        }
        if self.inflight_units == 0 {
            return Err(StreamError::Config("inflight_units must be > 0".into()));
        }
        Ok(())
    }

    pub fn profile(&self) -> ParallelismProfile {
        ParallelismProfile::new(self.workers, self.inflight_units)
    }
}
