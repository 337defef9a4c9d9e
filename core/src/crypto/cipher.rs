// ## 📂 File: `src/crypto/cipher.rs`

//! AES-CBC unit encryption.
//!
//! Design notes:
//! - One unit is encrypted as one independent CBC chain starting at its own IV.
//! - PKCS#7 padding is always applied to non-empty plaintext (1..=16 bytes).
//! - Empty plaintext encrypts to empty ciphertext. That is how the stream
//!   terminator is represented, so no padding block is emitted for it.
//! - No randomness in here: `(key, iv, plaintext)` fully determines the output.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};

use crate::constants::AES_BLOCK_LEN;
use crate::crypto::types::{CipherSuite, CryptoError, Iv, StreamKey};

/// Block cipher selected by `CipherSuite`.
#[derive(Clone)]
pub enum BlockCipherImpl {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl BlockCipherImpl {
    /// Construct the cipher for `suite` from the stream key.
    pub fn from_suite_and_key(suite: CipherSuite, key: &StreamKey) -> Result<Self, CryptoError> {
        key.check_len(suite)?;
        let invalid = |_| CryptoError::InvalidKeyLen {
            expected: suite.key_len(),
            actual: key.len(),
        };

        match suite {
            CipherSuite::Aes128Cbc => Aes128::new_from_slice(key.as_bytes())
                .map(Self::Aes128)
                .map_err(invalid),
            CipherSuite::Aes192Cbc => Aes192::new_from_slice(key.as_bytes())
                .map(Self::Aes192)
                .map_err(invalid),
            CipherSuite::Aes256Cbc => Aes256::new_from_slice(key.as_bytes())
                .map(Self::Aes256)
                .map_err(invalid),
        }
    }

    pub fn suite(&self) -> CipherSuite {
        match self {
            Self::Aes128(_) => CipherSuite::Aes128Cbc,
            Self::Aes192(_) => CipherSuite::Aes192Cbc,
            Self::Aes256(_) => CipherSuite::Aes256Cbc,
        }
    }

    #[inline]
    fn encrypt_block(&self, block: &mut [u8]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            Self::Aes128(c) => c.encrypt_block(block),
            Self::Aes192(c) => c.encrypt_block(block),
            Self::Aes256(c) => c.encrypt_block(block),
        }
    }

    /// Encrypt one unit: PKCS#7 pad, then chain from `iv`.
    pub fn encrypt_unit(&self, iv: &Iv, plaintext: &[u8]) -> Vec<u8> {
        if plaintext.is_empty() {
            return Vec::new();
        }

        let mut buf = pkcs7_pad(plaintext);
        let mut prev: Iv = *iv;

        for block in buf.chunks_exact_mut(AES_BLOCK_LEN) {
            for (b, p) in block.iter_mut().zip(prev.iter()) {
                *b ^= p;
            }
            self.encrypt_block(block);
            prev.copy_from_slice(block);
        }

        buf
    }
}

impl std::fmt::Debug for BlockCipherImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlockCipherImpl({})", self.suite())
    }
}

/// Ciphertext length for a plaintext of `len` bytes.
#[inline]
pub fn padded_len(len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (len / AES_BLOCK_LEN + 1) * AES_BLOCK_LEN
    }
}

fn pkcs7_pad(plaintext: &[u8]) -> Vec<u8> {
    let total = padded_len(plaintext.len());
    let pad = (total - plaintext.len()) as u8;
    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(plaintext);
    buf.resize(total, pad);
    buf
}
