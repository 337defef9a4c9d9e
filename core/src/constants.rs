// ## 📂 File: `src/constants.rs`

//! Pinned sizes and defaults.
//!
//! Everything here feeds the canonical stream hash in one way or another.
//! Changing a value changes every stream hash produced afterwards.

/// Maximum size of one encrypted blob (2 MiB).
pub const BLOB_SIZE: usize = 2 * 1024 * 1024;

/// Smallest blob size accepted by `PipelineConfig::validate` (64 KiB).
pub const MIN_BLOB_SIZE: usize = 64 * 1024;

/// Largest blob size accepted by `PipelineConfig::validate` (32 MiB).
pub const MAX_BLOB_SIZE: usize = 32 * 1024 * 1024;

/// AES block length, which is also the CBC IV length.
pub const AES_BLOCK_LEN: usize = 16;

/// IV length for the chained mode (one AES block).
pub const IV_LEN: usize = AES_BLOCK_LEN;

/// Key lengths accepted by the cipher registry (AES-128/192/256).
pub const KEY_LENGTHS: &[usize] = &[16, 24, 32];

/// Default key length, AES-128.
pub const DEFAULT_KEY_LEN: usize = 16;

/// SHA-384 output length in bytes.
pub const DIGEST_LEN: usize = 48;

/// Value of the `stream_type` field in the descriptor document.
pub const STREAM_TYPE: &str = "lbryfile";

/// Defaults when `PipelineConfig` fields are not supplied.
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_INFLIGHT_UNITS: usize = 8;

/// Hard cap on in-flight units for `ParallelismProfile::dynamic`.
pub const MAX_INFLIGHT_UNITS: usize = 64;

/// Largest plaintext unit that still fits in `blob_size` once PKCS#7 padded.
///
/// PKCS#7 always appends at least one byte, so a unit of `blob_size - 1`
/// bytes pads to at most `blob_size`.
#[inline]
pub const fn max_unit_len(blob_size: usize) -> usize {
    blob_size - 1
}
