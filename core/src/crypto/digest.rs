// ## 📂 File: `src/crypto/digest.rs`

//! Content addresses.
//!
//! Both blob hashes and stream hashes are SHA-384 digests, exchanged as
//! 96 lowercase hex characters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha384};
use thiserror::Error;

use crate::constants::DIGEST_LEN;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    #[error("invalid digest hex: {0}")]
    InvalidHex(String),

    #[error("invalid digest length: expected={expected}, actual={actual}")]
    InvalidLength { expected: usize, actual: usize },
}

macro_rules! digest_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; DIGEST_LEN]);

        impl $name {
            #[inline]
            pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
                Self(bytes)
            }

            #[inline]
            pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
                &self.0
            }

            /// Lowercase hex.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            pub fn from_hex(s: &str) -> Result<Self, DigestError> {
                let bytes = hex::decode(s).map_err(|e| DigestError::InvalidHex(e.to_string()))?;
                let actual = bytes.len();
                let arr: [u8; DIGEST_LEN] = bytes.try_into().map_err(|_| DigestError::InvalidLength {
                    expected: DIGEST_LEN,
                    actual,
                })?;
                Ok(Self(arr))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = DigestError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

digest_newtype!(
    /// SHA-384 of one ciphertext blob. This is the blob's storage key.
    BlobHash
);

digest_newtype!(
    /// SHA-384 of the canonical stream descriptor. The stream's permanent id.
    StreamHash
);

/// Content address of a ciphertext blob: SHA-384 over the exact ciphertext bytes.
pub fn blob_hash(ciphertext: &[u8]) -> BlobHash {
    BlobHash(sha384(ciphertext))
}

#[inline]
pub(crate) fn sha384(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&Sha384::digest(data));
    out
}
