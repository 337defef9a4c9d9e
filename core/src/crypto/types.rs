// ## 📂 File: `src/crypto/types.rs`

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{AES_BLOCK_LEN, IV_LEN, KEY_LENGTHS};

/// One CBC initialization vector (one AES block).
pub type Iv = [u8; IV_LEN];

#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key does not match the length the cipher configuration requires.
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLen { expected: usize, actual: usize },

    /// Block size / key length pair has no registered cipher.
    #[error("unsupported cipher: block_size={block_size}, key_len={key_len}")]
    UnsupportedCipher { block_size: usize, key_len: usize },

    /// IV supplier produced no further value. `issued` IVs were handed out before.
    #[error("IV supplier exhausted after {issued} IVs")]
    IvExhausted { issued: u64 },

    /// A thread panicked while holding the IV supplier lock.
    #[error("IV supplier lock poisoned")]
    IvSupplierPoisoned,
}

/// Cipher registry. CBC with PKCS#7 padding; the key length picks the AES variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherSuite {
    Aes128Cbc,
    Aes192Cbc,
    Aes256Cbc,
}

impl CipherSuite {
    /// Resolve a suite from `(block_size, key_len)` as supplied by the session.
    pub fn resolve(block_size: usize, key_len: usize) -> Result<Self, CryptoError> {
        match (block_size, key_len) {
            (AES_BLOCK_LEN, 16) => Ok(CipherSuite::Aes128Cbc),
            (AES_BLOCK_LEN, 24) => Ok(CipherSuite::Aes192Cbc),
            (AES_BLOCK_LEN, 32) => Ok(CipherSuite::Aes256Cbc),
            _ => Err(CryptoError::UnsupportedCipher { block_size, key_len }),
        }
    }

    #[inline]
    pub fn key_len(self) -> usize {
        match self {
            CipherSuite::Aes128Cbc => 16,
            CipherSuite::Aes192Cbc => 24,
            CipherSuite::Aes256Cbc => 32,
        }
    }

    #[inline]
    pub fn block_size(self) -> usize {
        AES_BLOCK_LEN
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CipherSuite::Aes128Cbc => "aes-128-cbc",
            CipherSuite::Aes192Cbc => "aes-192-cbc",
            CipherSuite::Aes256Cbc => "aes-256-cbc",
        };
        f.write_str(name)
    }
}

/// Symmetric stream key.
///
/// The key is embedded (hex) in the stream descriptor and hashed into the
/// stream hash, so it is not secret from whoever holds the descriptor.
#[derive(Clone, PartialEq, Eq)]
pub struct StreamKey(Vec<u8>);

impl StreamKey {
    /// Wrap caller-supplied key bytes. Length is checked against the cipher
    /// suite when the stream is created, not here.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Fresh random key for `suite` from the OS RNG.
    pub fn generate(suite: CipherSuite) -> Self {
        let mut bytes = vec![0u8; suite.key_len()];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Fail unless the key length matches `suite`.
    pub fn check_len(&self, suite: CipherSuite) -> Result<(), CryptoError> {
        if self.0.len() != suite.key_len() || !KEY_LENGTHS.contains(&self.0.len()) {
            return Err(CryptoError::InvalidKeyLen {
                expected: suite.key_len(),
                actual: self.0.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex, as written into the descriptor.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<&[u8]> for StreamKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Debug for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StreamKey({} bytes)", self.0.len())
    }
}
