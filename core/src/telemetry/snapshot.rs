// ## src/telemetry/snapshot.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Immutable per-stream telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub units_data: u64,
    pub units_terminator: u64,
    pub bytes_plaintext: u64,
    pub bytes_ciphertext: u64,
    pub blobs_persisted: u64,
    pub blobs_deduplicated: u64,
    pub throughput_plaintext_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_plaintext as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            units_data: counters.units_data,
            units_terminator: counters.units_terminator,
            bytes_plaintext: counters.bytes_plaintext,
            bytes_ciphertext: counters.bytes_ciphertext,
            blobs_persisted: counters.blobs_persisted,
            blobs_deduplicated: counters.blobs_deduplicated,
            throughput_plaintext_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal consistency:
    /// - exactly one terminator
    /// - every data unit was either persisted or deduplicated
    /// - padding adds 1..=16 bytes per data unit
    pub fn sanity_check(&self) -> bool {
        let padding = self.bytes_ciphertext.saturating_sub(self.bytes_plaintext);
        self.units_terminator == 1
            && self.blobs_persisted + self.blobs_deduplicated == self.units_data
            && self.bytes_ciphertext >= self.bytes_plaintext
            && padding >= self.units_data
            && padding <= self.units_data * 16
    }
}
