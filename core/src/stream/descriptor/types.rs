// ## 📂 File: `src/stream/descriptor/types.rs`

use std::ffi::OsStr;
use std::fmt;
use std::str::FromStr;

use unicode_normalization::UnicodeNormalization;

use crate::crypto::{BlobHash, Iv, StreamHash, StreamKey};
use crate::stream::descriptor::hash::hash_descriptor;
use crate::types::StreamError;
use crate::utils::basename;

/// Canonical file name: final path component, Unicode NFC, UTF-8.
///
/// Two names that differ only in encoding (UTF-16 vs UTF-8) or normalization
/// form (NFD vs NFC) compare equal and hash identically.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamName(String);

impl StreamName {
    pub fn new(name: &str) -> Result<Self, StreamError> {
        let base = basename(name);
        if base.is_empty() {
            return Err(StreamError::Encoding(format!("empty file name in {name:?}")));
        }
        if base.contains('\0') {
            return Err(StreamError::Encoding("file name contains NUL".into()));
        }
        Ok(Self(base.nfc().collect()))
    }

    pub fn from_utf16(units: &[u16]) -> Result<Self, StreamError> {
        let s = String::from_utf16(units).map_err(|e| StreamError::Encoding(e.to_string()))?;
        Self::new(&s)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StreamError> {
        let s = std::str::from_utf8(bytes).map_err(|e| StreamError::Encoding(e.to_string()))?;
        Self::new(s)
    }

    pub fn from_os_str(name: &OsStr) -> Result<Self, StreamError> {
        let s = name
            .to_str()
            .ok_or_else(|| StreamError::Encoding(format!("{name:?} is not valid Unicode")))?;
        Self::new(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Lowercase hex of the UTF-8 bytes, as hashed and as written to the descriptor.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.as_bytes())
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StreamName({:?})", self.0)
    }
}

impl FromStr for StreamName {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for StreamName {
    type Error = StreamError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

/// One entry of the blob manifest.
///
/// Data records carry the blob hash and a non-zero ciphertext length. The
/// single terminator record at the end has neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobRecord {
    pub sequence_index: u64,
    pub blob_hash: Option<BlobHash>,
    pub iv: Iv,
    /// Ciphertext length in bytes.
    pub length: u64,
}

impl BlobRecord {
    pub fn data(sequence_index: u64, blob_hash: BlobHash, iv: Iv, length: u64) -> Self {
        Self {
            sequence_index,
            blob_hash: Some(blob_hash),
            iv,
            length,
        }
    }

    pub fn terminator(sequence_index: u64, iv: Iv) -> Self {
        Self {
            sequence_index,
            blob_hash: None,
            iv,
            length: 0,
        }
    }

    #[inline]
    pub fn is_terminator(&self) -> bool {
        self.length == 0
    }
}

/// Ordered manifest of a stream plus its metadata.
///
/// Only `DescriptorBuilder` and `parse_descriptor` construct one, so
/// `blobs` is always gap-free and ends in exactly one terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub(crate) stream_name: StreamName,
    pub(crate) key: StreamKey,
    pub(crate) suggested_file_name: StreamName,
    pub(crate) blobs: Vec<BlobRecord>,
    pub(crate) total_length: u64,
}

impl StreamDescriptor {
    pub fn stream_name(&self) -> &StreamName {
        &self.stream_name
    }

    pub fn key(&self) -> &StreamKey {
        &self.key
    }

    pub fn suggested_file_name(&self) -> &StreamName {
        &self.suggested_file_name
    }

    /// All records, terminator last.
    pub fn blobs(&self) -> &[BlobRecord] {
        &self.blobs
    }

    /// Records that name a stored blob.
    pub fn data_blobs(&self) -> impl Iterator<Item = &BlobRecord> {
        self.blobs.iter().filter(|b| !b.is_terminator())
    }

    /// Plaintext bytes in the stream.
    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    /// Canonical hash. Recomputed on every call.
    pub fn stream_hash(&self) -> StreamHash {
        hash_descriptor(self)
    }
}
