// ## 📂 File: `src/stream/io.rs`
// ## Normalized input + ordered record collector

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::PathBuf;

use bytes::Bytes;
use tracing::trace;

use crate::stream::descriptor::{DescriptorBuilder, StreamDescriptor};
use crate::stream::state::{StreamLifecycle, StreamState};
use crate::stream::unit_worker::UnitOutcome;
use crate::telemetry::{StageTimes, TelemetryCounters};
use crate::types::{OrderViolation, StreamError};

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

impl std::fmt::Debug for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Reader(_) => f.write_str("InputSource::Reader"),
            InputSource::File(p) => write!(f, "InputSource::File({})", p.display()),
            InputSource::Memory(b) => write!(f, "InputSource::Memory({} bytes)", b.len()),
        }
    }
}

impl InputSource {
    /// Length in bytes when it is known without reading: in-memory buffers
    /// and regular files.
    pub fn known_len(&self) -> Option<u64> {
        match self {
            InputSource::Reader(_) => None,
            InputSource::File(p) => std::fs::metadata(p).ok().filter(|m| m.is_file()).map(|m| m.len()),
            InputSource::Memory(b) => Some(b.len() as u64),
        }
    }
}

/// Normalize input source into a boxed reader
pub fn open_input(src: InputSource) -> Result<Box<dyn Read + Send>, StreamError> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => Box::new(std::fs::File::open(p)?),
        InputSource::Memory(b) => Box::new(io::Cursor::new(b)),
    };
    Ok(reader)
}

/// Read up to `len` bytes, stopping early only at EOF.
///
/// Short reads are coalesced and `Interrupted` is retried. A short final
/// unit does not keep a full `len` allocation alive.
pub fn read_exact_or_eof<R: Read>(r: &mut R, len: usize) -> io::Result<Bytes> {
    let mut buf = Vec::with_capacity(len);
    r.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        buf.shrink_to_fit();
    }
    Ok(Bytes::from(buf))
}

// ================= Ordered collector =================

/// Buffers worker completions and feeds them to the descriptor builder in
/// sequence order, advancing the stream lifecycle per record.
pub struct OrderedRecordCollector<'a> {
    next: u64,
    pending: BTreeMap<u64, UnitOutcome>,
    builder: DescriptorBuilder,
    lifecycle: &'a mut StreamLifecycle,
    counters: TelemetryCounters,
    stage_times: StageTimes,
}

impl<'a> OrderedRecordCollector<'a> {
    pub fn new(builder: DescriptorBuilder, lifecycle: &'a mut StreamLifecycle) -> Self {
        Self {
            next: 0,
            pending: BTreeMap::new(),
            builder,
            lifecycle,
            counters: TelemetryCounters::default(),
            stage_times: StageTimes::default(),
        }
    }

    /// Records handed to the builder so far.
    pub fn delivered(&self) -> u64 {
        self.next
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn push(&mut self, outcome: UnitOutcome) -> Result<(), StreamError> {
        let index = outcome.record.sequence_index;
        if index < self.next || self.pending.contains_key(&index) {
            return Err(StreamError::OutOfOrderBlob {
                expected: self.next,
                violation: OrderViolation::Unexpected { actual: index },
            });
        }
        if index != self.next {
            trace!(sequence_index = index, waiting_for = self.next, "buffering out-of-order unit");
        }
        self.pending.insert(index, outcome);
        self.flush_ready()
    }

    fn flush_ready(&mut self) -> Result<(), StreamError> {
        while let Some(outcome) = self.pending.remove(&self.next) {
            self.builder.push(outcome.record, outcome.plaintext_len)?;
            self.lifecycle.advance(StreamState::Encrypting(self.next))?;
            self.counters.merge(&outcome.counters);
            self.stage_times.merge(&outcome.stage_times);
            self.next += 1;
        }
        Ok(())
    }

    /// All units delivered: hand back the descriptor and the merged telemetry.
    pub fn finish(self) -> Result<(StreamDescriptor, TelemetryCounters, StageTimes), StreamError> {
        if let Some(&actual) = self.pending.keys().next() {
            return Err(StreamError::OutOfOrderBlob {
                expected: self.next,
                violation: OrderViolation::Unexpected { actual },
            });
        }
        let descriptor = self.builder.finish()?;
        Ok((descriptor, self.counters, self.stage_times))
    }
}
