use std::fmt;
use std::io;

use thiserror::Error;

use crate::crypto::{CryptoError, DigestError, StreamHash};
use crate::storage::StorageError;
use crate::stream::state::StreamState;

/// Unified stream-creation error.
/// - `From<T>` impls let `?` flow from I/O, crypto and storage into the pipeline.
/// - Every failure aborts the enclosing `create_stream` call; nothing is swallowed.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The input source failed mid-read. No partial hash is produced.
    #[error("input read error: {0}")]
    InputRead(#[from] io::Error),

    /// Key length does not match the session's cipher configuration.
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// The IV supplier ran dry while unit `sequence_index` needed one.
    #[error("IV supplier exhausted at unit {sequence_index}")]
    IvExhausted { sequence_index: u64 },

    /// The storage collaborator rejected a blob or the descriptor.
    #[error("persistence error: {0}")]
    Persistence(#[from] StorageError),

    /// Blob records reached the descriptor out of sequence. Sequencing bug.
    #[error("out-of-order blob: expected unit {expected}, {violation}")]
    OutOfOrderBlob { expected: u64, violation: OrderViolation },

    /// The filename cannot be canonically encoded.
    #[error("filename encoding error: {0}")]
    Encoding(String),

    /// The caller cancelled the stream before it completed.
    #[error("stream creation cancelled")]
    Cancelled,

    /// Illegal lifecycle transition.
    #[error("invalid stream state transition: {from} -> {to}")]
    InvalidTransition { from: StreamState, to: StreamState },

    /// Invalid pipeline or cipher configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed descriptor document.
    #[error("descriptor error: {0}")]
    Descriptor(String),

    /// Descriptor document carries a stream hash its contents do not produce.
    #[error("descriptor hash mismatch: embedded={expected}, computed={actual}")]
    DescriptorMismatch { expected: StreamHash, actual: StreamHash },

    /// Pipeline wiring failure (channel closed, thread panicked).
    #[error("pipeline error: {0}")]
    Pipeline(&'static str),
}

/// What exactly went wrong in an `OutOfOrderBlob`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderViolation {
    /// A record with a different index arrived (gap or duplicate).
    Unexpected { actual: u64 },
    /// A record arrived after the terminator.
    AfterTerminator { actual: u64 },
    /// Finalize was attempted before the terminator was reported.
    MissingTerminator,
}

impl fmt::Display for OrderViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderViolation::Unexpected { actual } => write!(f, "got unit {}", actual),
            OrderViolation::AfterTerminator { actual } => {
                write!(f, "got unit {} after the stream terminator", actual)
            }
            OrderViolation::MissingTerminator => {
                write!(f, "finalized before the stream terminator was reported")
            }
        }
    }
}

impl From<CryptoError> for StreamError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidKeyLen { expected, actual } => {
                StreamError::InvalidKeyLength { expected, actual }
            }
            CryptoError::IvExhausted { issued } => StreamError::IvExhausted { sequence_index: issued },
            CryptoError::IvSupplierPoisoned => StreamError::Pipeline("IV supplier lock poisoned"),
            e @ CryptoError::UnsupportedCipher { .. } => StreamError::Config(e.to_string()),
        }
    }
}

impl From<DigestError> for StreamError {
    fn from(e: DigestError) -> Self {
        StreamError::Descriptor(e.to_string())
    }
}
