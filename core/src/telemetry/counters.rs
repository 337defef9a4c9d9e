// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Mutable counters used during stream creation.
//!
//! Each worker keeps its own counters per unit; the collector merges them.
//! Converted into an immutable `TelemetrySnapshot` at pipeline end.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub units_data: u64,
    pub units_terminator: u64,
    pub bytes_plaintext: u64,
    pub bytes_ciphertext: u64,
    pub blobs_persisted: u64,
    pub blobs_deduplicated: u64,
}

impl TelemetryCounters {
    /// Record one encrypted data unit.
    pub fn add_data(&mut self, pt_len: usize, ct_len: usize) {
        self.units_data += 1;
        self.bytes_plaintext += pt_len as u64;
        self.bytes_ciphertext += ct_len as u64;
    }

    pub fn add_terminator(&mut self) {
        self.units_terminator += 1;
    }

    pub fn add_persisted(&mut self) {
        self.blobs_persisted += 1;
    }

    /// Blob was already durable; `put_blob` skipped.
    pub fn add_deduplicated(&mut self) {
        self.blobs_deduplicated += 1;
    }

    /// PKCS#7 padding bytes added across all units.
    pub fn padding_bytes(&self) -> u64 {
        self.bytes_ciphertext.saturating_sub(self.bytes_plaintext)
    }

    // No locks inside workers: each unit carries its own counters.
    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.units_data += other.units_data;
        self.units_terminator += other.units_terminator;
        self.bytes_plaintext += other.bytes_plaintext;
        self.bytes_ciphertext += other.bytes_ciphertext;
        self.blobs_persisted += other.blobs_persisted;
        self.blobs_deduplicated += other.blobs_deduplicated;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
