//! Unit workers.
//!
//! A worker takes one plaintext unit with its pre-assigned IV, encrypts it,
//! hashes the ciphertext and persists the blob before reporting back.
//! Workers are stateless between units and fully parallelizable.

pub mod types;
pub mod encrypt;

pub use types::{UnitContext, UnitInput, UnitKind, UnitOutcome};
pub use encrypt::EncryptUnitWorker;
