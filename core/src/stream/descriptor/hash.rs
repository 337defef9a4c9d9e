// ## 📂 File: `src/stream/descriptor/hash.rs`

//! Stream hasher.
//!
//! Canonical form, bit-exact:
//!
//! ```text
//! record_digest(r) = SHA384( [hex(r.blob_hash) if r.length != 0]
//!                            || decimal(r.sequence_index)
//!                            || hex(r.iv)
//!                            || decimal(r.length) )
//! blobs_digest     = SHA384( record_digest(r0) || record_digest(r1) || … )
//! stream_hash      = SHA384( hex(stream_name) || hex(key)
//!                            || hex(suggested_file_name) || blobs_digest )
//! ```
//!
//! Hex is lowercase; digests are concatenated as raw bytes. `total_length`
//! is not an input.

use sha2::{Digest, Sha384};

use crate::crypto::{StreamHash, StreamKey};
use crate::stream::descriptor::types::{BlobRecord, StreamDescriptor, StreamName};

/// Incremental hasher, fed one record at a time in sequence order.
#[derive(Clone, Default)]
pub struct StreamHasher {
    blobs: Sha384,
}

impl StreamHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, record: &BlobRecord) {
        let mut h = Sha384::new();
        match record.blob_hash {
            Some(blob_hash) if !record.is_terminator() => h.update(blob_hash.to_hex().as_bytes()),
            _ => {}
        }
        h.update(record.sequence_index.to_string().as_bytes());
        h.update(hex::encode(record.iv).as_bytes());
        h.update(record.length.to_string().as_bytes());
        self.blobs.update(h.finalize());
    }

    pub fn finish(self, stream_name: &StreamName, key: &StreamKey, suggested_file_name: &StreamName) -> StreamHash {
        let mut h = Sha384::new();
        h.update(stream_name.to_hex().as_bytes());
        h.update(key.to_hex().as_bytes());
        h.update(suggested_file_name.to_hex().as_bytes());
        h.update(self.blobs.finalize());

        let mut out = [0u8; crate::constants::DIGEST_LEN];
        out.copy_from_slice(&h.finalize());
        StreamHash::from_bytes(out)
    }
}

pub fn hash_descriptor(descriptor: &StreamDescriptor) -> StreamHash {
    let mut hasher = StreamHasher::new();
    for record in descriptor.blobs() {
        hasher.update(record);
    }
    hasher.finish(descriptor.stream_name(), descriptor.key(), descriptor.suggested_file_name())
}
