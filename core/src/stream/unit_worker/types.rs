use bytes::Bytes;

use crate::crypto::{BlockCipherImpl, Iv};
use crate::stream::descriptor::BlobRecord;
use crate::telemetry::{StageTimes, TelemetryCounters};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Data,
    /// Zero-length end-of-stream marker. Never persisted.
    Terminator,
}

/// Reader → worker. The IV is already assigned.
#[derive(Debug, Clone)]
pub struct UnitInput {
    pub sequence_index: u64,
    pub plaintext: Bytes,
    pub iv: Iv,
    pub kind: UnitKind,
}

impl UnitInput {
    pub fn data(sequence_index: u64, plaintext: Bytes, iv: Iv) -> Self {
        Self {
            sequence_index,
            plaintext,
            iv,
            kind: UnitKind::Data,
        }
    }

    pub fn terminator(sequence_index: u64, iv: Iv) -> Self {
        Self {
            sequence_index,
            plaintext: Bytes::new(),
            iv,
            kind: UnitKind::Terminator,
        }
    }
}

/// Worker → collector. The blob (if any) is durable by the time this is sent.
#[derive(Debug, Clone)]
pub struct UnitOutcome {
    pub record: BlobRecord,
    pub plaintext_len: u64,
    pub counters: TelemetryCounters,
    pub stage_times: StageTimes,
}

/// Per-stream state shared (by clone) across workers.
#[derive(Debug, Clone)]
pub struct UnitContext {
    pub cipher: BlockCipherImpl,
    pub skip_existing: bool,
}
