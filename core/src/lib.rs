//! cryptstream-core
//!
//! Deterministic encrypted, content-addressed streams: input bytes are cut
//! into units, each unit is AES-CBC encrypted under a caller-supplied IV and
//! stored as a blob named by its SHA-384, and the ordered blob manifest is
//! hashed into the stream's permanent identifier.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

pub mod crypto;
pub mod telemetry;

// Collaborators
pub mod announce;
pub mod config;
pub mod session;
pub mod storage;

// Stream layers
pub mod stream;

pub use stream::{create_stream, CreatedStream, StreamCreator};
pub use types::StreamError;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::announce::{announce_stream, AnnounceKey, HashAnnouncer};
    pub use crate::config::PipelineConfig;
    pub use crate::crypto::{BlobHash, CipherSuite, IvSupplier, RandomIvs, StreamHash, StreamKey};
    pub use crate::session::{CipherConfig, SessionContext};
    pub use crate::storage::{BlobStore, DiskBlobStore, InMemoryBlobStore};
    pub use crate::stream::descriptor::{parse_descriptor, verify_descriptor, StreamDescriptor, StreamName};
    pub use crate::stream::{create_stream, CancelToken, CreatedStream, InputSource, StreamCreator};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::StreamError;
}
