//! Stream descriptor: ordered blob manifest, its canonical hash, and the
//! JSON document persisted next to the blobs.

pub mod types;
pub mod builder;
pub mod hash;
pub mod encode;

pub use types::{BlobRecord, StreamDescriptor, StreamName};
pub use builder::DescriptorBuilder;
pub use hash::{hash_descriptor, StreamHasher};
pub use encode::{encode_descriptor, parse_descriptor, verify_descriptor, BlobEntry, DescriptorDocument};
