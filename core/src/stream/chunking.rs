// ## 📂 File: `src/stream/chunking.rs`

//! Chunker: input stream → ordered plaintext units.
//!
//! - Every unit is exactly `unit_len` bytes except possibly the last.
//! - Boundaries depend only on byte offsets. Short reads are coalesced.
//! - Empty input yields exactly one empty unit.
//! - A read error is yielded once and ends the sequence.

use std::io::{self, Read, Seek, SeekFrom};

use bytes::Bytes;
use tracing::trace;

use crate::stream::io::read_exact_or_eof;

/// One contiguous range of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaintextUnit {
    pub sequence_index: u64,
    pub bytes: Bytes,
}

impl PlaintextUnit {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Lazy, finite unit iterator over a reader.
#[derive(Debug)]
pub struct Chunker<R> {
    reader: R,
    unit_len: usize,
    next_index: u64,
    finished: bool,
}

impl<R: Read> Chunker<R> {
    /// `unit_len` must be non-zero.
    pub fn new(reader: R, unit_len: usize) -> Self {
        debug_assert!(unit_len > 0);
        Self {
            reader,
            unit_len,
            next_index: 0,
            finished: false,
        }
    }

    pub fn unit_len(&self) -> usize {
        self.unit_len
    }

    /// Units yielded so far.
    pub fn units_emitted(&self) -> u64 {
        self.next_index
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek> Chunker<R> {
    /// Seek back to offset 0. The next iteration yields the same units again.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.next_index = 0;
        self.finished = false;
        Ok(())
    }
}

impl<R: Read> Iterator for Chunker<R> {
    type Item = io::Result<PlaintextUnit>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let bytes = match read_exact_or_eof(&mut self.reader, self.unit_len) {
            Ok(b) => b,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        if bytes.len() < self.unit_len {
            self.finished = true;
        }
        if bytes.is_empty() && self.next_index > 0 {
            return None;
        }

        let unit = PlaintextUnit {
            sequence_index: self.next_index,
            bytes,
        };
        trace!(sequence_index = unit.sequence_index, len = unit.len(), "unit read");
        self.next_index += 1;
        Some(Ok(unit))
    }
}
