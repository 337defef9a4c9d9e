// ## 📂 File: `src/session.rs`

//! Session/context collaborator.
//!
//! Read-only for the pipeline: where blobs live (namespace directory) and
//! which cipher the session requires.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tracing::debug;

use crate::constants::{AES_BLOCK_LEN, DEFAULT_KEY_LEN};
use crate::crypto::CipherSuite;
use crate::storage::{DiskBlobStore, StorageError};
use crate::types::StreamError;

/// Block size and key length the session requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    pub block_size: usize,
    pub key_len: usize,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            block_size: AES_BLOCK_LEN,
            key_len: DEFAULT_KEY_LEN,
        }
    }
}

impl CipherConfig {
    pub fn new(block_size: usize, key_len: usize) -> Self {
        Self { block_size, key_len }
    }

    /// Resolve to a registered cipher suite, or `StreamError::Config`.
    pub fn validate(&self) -> Result<CipherSuite, StreamError> {
        Ok(CipherSuite::resolve(self.block_size, self.key_len)?)
    }
}

/// Storage namespace plus cipher configuration for one session.
///
/// A scratch session owns its namespace directory and removes it on drop.
#[derive(Debug)]
pub struct SessionContext {
    namespace: PathBuf,
    cipher: CipherConfig,
    scratch: Option<TempDir>,
}

impl SessionContext {
    pub fn new(namespace: impl Into<PathBuf>, cipher: CipherConfig) -> Self {
        Self {
            namespace: namespace.into(),
            cipher,
            scratch: None,
        }
    }

    /// Session backed by a fresh temporary directory.
    pub fn scratch(cipher: CipherConfig) -> Result<Self, StreamError> {
        let dir = tempfile::Builder::new()
            .prefix("cryptstream-")
            .tempdir()
            .map_err(StorageError::Io)?;
        debug!(namespace = %dir.path().display(), "scratch session created");
        Ok(Self {
            namespace: dir.path().to_path_buf(),
            cipher,
            scratch: Some(dir),
        })
    }

    pub fn namespace(&self) -> &Path {
        &self.namespace
    }

    pub fn cipher(&self) -> CipherConfig {
        self.cipher
    }

    pub fn is_scratch(&self) -> bool {
        self.scratch.is_some()
    }

    /// Disk store rooted at the namespace directory.
    pub fn open_disk_store(&self) -> Result<DiskBlobStore, StreamError> {
        Ok(DiskBlobStore::open(&self.namespace)?)
    }
}
