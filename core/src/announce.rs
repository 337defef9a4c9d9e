// ## 📂 File: `src/announce.rs`

//! Announcement collaborator.
//!
//! The core never announces anything itself. The layer above calls
//! `announce_stream` once `create_stream` has returned a hash.

use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

use crate::crypto::{BlobHash, StreamHash};
use crate::stream::descriptor::StreamDescriptor;

#[derive(Debug, Error)]
pub enum AnnounceError {
    #[error("announcer unavailable: {0}")]
    Unavailable(String),
}

/// Something a peer can look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnounceKey {
    Stream(StreamHash),
    Blob(BlobHash),
}

pub trait HashAnnouncer: Send + Sync {
    fn announce(&self, key: AnnounceKey) -> Result<(), AnnounceError>;
}

/// Announce the stream hash and the stream's first data blob.
///
/// Returns the number of keys announced (1 for an empty stream, 2 otherwise).
pub fn announce_stream(
    announcer: &dyn HashAnnouncer,
    descriptor: &StreamDescriptor,
) -> Result<usize, AnnounceError> {
    let stream_hash = descriptor.stream_hash();
    announcer.announce(AnnounceKey::Stream(stream_hash))?;
    let mut announced = 1;

    if let Some(first) = descriptor.blobs().iter().find_map(|b| b.blob_hash) {
        announcer.announce(AnnounceKey::Blob(first))?;
        announced += 1;
    }

    debug!(%stream_hash, announced, "stream announced");
    Ok(announced)
}

/// Test double that remembers every announcement in order.
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    seen: Mutex<Vec<AnnounceKey>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announced(&self) -> Vec<AnnounceKey> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl HashAnnouncer for RecordingAnnouncer {
    fn announce(&self, key: AnnounceKey) -> Result<(), AnnounceError> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).push(key);
        Ok(())
    }
}
