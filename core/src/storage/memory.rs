//! In-memory blob store (for testing)

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::crypto::{BlobHash, StreamHash};
use crate::storage::{verify_blob, BlobStore, StorageError, StorageResult};

/// In-memory store for tests.
///
/// Thread-safe via `RwLock`. Counts every `put_blob` attempt and can be told
/// to reject the n-th one to exercise the pipeline's failure path.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<BlobHash, Vec<u8>>>,
    descriptors: RwLock<HashMap<StreamHash, Vec<u8>>>,
    put_attempts: AtomicUsize,
    fail_on_put: Option<usize>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `n`-th `put_blob` call (1-based) with `StorageError::Rejected`.
    pub fn failing_on_put(n: usize) -> Self {
        Self {
            fail_on_put: Some(n),
            ..Self::default()
        }
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `put_blob` calls made so far, successful or not.
    pub fn put_attempts(&self) -> usize {
        self.put_attempts.load(Ordering::SeqCst)
    }

    pub fn descriptor_count(&self) -> usize {
        self.descriptors.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Total ciphertext bytes stored
    pub fn total_size(&self) -> usize {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|v| v.len())
            .sum()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put_blob(&self, blob_hash: &BlobHash, ciphertext: &[u8]) -> StorageResult<()> {
        let attempt = self.put_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_put == Some(attempt) {
            return Err(StorageError::Rejected(format!("injected failure on put #{attempt}")));
        }

        verify_blob(blob_hash, ciphertext)?;
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(*blob_hash, ciphertext.to_vec());
        Ok(())
    }

    fn has_blob(&self, blob_hash: &BlobHash) -> bool {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(blob_hash)
    }

    fn put_descriptor(&self, stream_hash: &StreamHash, descriptor: &[u8]) -> StorageResult<()> {
        self.descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(*stream_hash, descriptor.to_vec());
        Ok(())
    }

    fn get_blob(&self, blob_hash: &BlobHash) -> StorageResult<Vec<u8>> {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(blob_hash)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(blob_hash.to_hex()))
    }

    fn get_descriptor(&self, stream_hash: &StreamHash) -> StorageResult<Vec<u8>> {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(stream_hash)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(stream_hash.to_hex()))
    }
}
