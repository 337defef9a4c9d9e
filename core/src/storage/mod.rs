//! Storage collaborator.
//!
//! Content-addressed blob storage plus a descriptor slot per stream. The
//! pipeline only ever talks to the `BlobStore` trait.
//!
//! | Backend             | Use case                        |
//! |---------------------|---------------------------------|
//! | `DiskBlobStore`     | Production, one directory tree  |
//! | `InMemoryBlobStore` | Tests, with fault injection     |

use std::io;

use thiserror::Error;

use crate::crypto::{BlobHash, StreamHash};

pub mod disk;
pub mod memory;

pub use disk::DiskBlobStore;
pub use memory::InMemoryBlobStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    /// Data handed to `put_blob` does not digest to the given blob hash.
    #[error("hash mismatch: expected={expected}, actual={actual}")]
    HashMismatch { expected: BlobHash, actual: BlobHash },

    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backend refused the write.
    #[error("write rejected: {0}")]
    Rejected(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Content-addressed blob storage.
///
/// Implementations MUST verify `SHA-384(ciphertext) == blob_hash` on
/// `put_blob`. A put is durable once it returns `Ok`.
pub trait BlobStore: Send + Sync {
    /// Store one ciphertext blob under its hash. Idempotent.
    fn put_blob(&self, blob_hash: &BlobHash, ciphertext: &[u8]) -> StorageResult<()>;

    /// Whether a blob with this hash is already durable.
    fn has_blob(&self, blob_hash: &BlobHash) -> bool;

    /// Store the descriptor document of a finished stream.
    fn put_descriptor(&self, stream_hash: &StreamHash, descriptor: &[u8]) -> StorageResult<()>;

    fn get_blob(&self, blob_hash: &BlobHash) -> StorageResult<Vec<u8>>;

    fn get_descriptor(&self, stream_hash: &StreamHash) -> StorageResult<Vec<u8>>;
}

/// Shared integrity check for `put_blob` implementations.
pub(crate) fn verify_blob(blob_hash: &BlobHash, ciphertext: &[u8]) -> StorageResult<()> {
    let actual = crate::crypto::blob_hash(ciphertext);
    if actual != *blob_hash {
        return Err(StorageError::HashMismatch {
            expected: *blob_hash,
            actual,
        });
    }
    Ok(())
}
