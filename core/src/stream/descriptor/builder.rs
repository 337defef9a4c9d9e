// ## 📂 File: `src/stream/descriptor/builder.rs`

use tracing::trace;

use crate::crypto::StreamKey;
use crate::stream::descriptor::types::{BlobRecord, StreamDescriptor, StreamName};
use crate::types::{OrderViolation, StreamError};

/// Accumulates records in strict sequence order.
///
/// Reordering concurrent completions is the caller's job
/// (`OrderedRecordCollector`); anything out of order here is a bug and
/// fails with `OutOfOrderBlob`.
#[derive(Debug)]
pub struct DescriptorBuilder {
    stream_name: StreamName,
    key: StreamKey,
    suggested_file_name: StreamName,
    blobs: Vec<BlobRecord>,
    total_length: u64,
    terminated: bool,
}

impl DescriptorBuilder {
    /// `suggested_file_name` defaults to `stream_name`.
    pub fn new(stream_name: StreamName, key: StreamKey, suggested_file_name: Option<StreamName>) -> Self {
        let suggested_file_name = suggested_file_name.unwrap_or_else(|| stream_name.clone());
        Self {
            stream_name,
            key,
            suggested_file_name,
            blobs: Vec::new(),
            total_length: 0,
            terminated: false,
        }
    }

    /// Index the next record must carry.
    pub fn next_index(&self) -> u64 {
        self.blobs.len() as u64
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Append `record`; `plaintext_len` feeds `total_length`.
    pub fn push(&mut self, record: BlobRecord, plaintext_len: u64) -> Result<(), StreamError> {
        let expected = self.next_index();
        if self.terminated {
            return Err(StreamError::OutOfOrderBlob {
                expected,
                violation: OrderViolation::AfterTerminator {
                    actual: record.sequence_index,
                },
            });
        }
        if record.sequence_index != expected {
            return Err(StreamError::OutOfOrderBlob {
                expected,
                violation: OrderViolation::Unexpected {
                    actual: record.sequence_index,
                },
            });
        }

        trace!(sequence_index = expected, length = record.length, "descriptor record");
        self.terminated = record.is_terminator();
        self.total_length += plaintext_len;
        self.blobs.push(record);
        Ok(())
    }

    pub fn finish(self) -> Result<StreamDescriptor, StreamError> {
        if !self.terminated {
            return Err(StreamError::OutOfOrderBlob {
                expected: self.next_index(),
                violation: OrderViolation::MissingTerminator,
            });
        }
        Ok(StreamDescriptor {
            stream_name: self.stream_name,
            key: self.key,
            suggested_file_name: self.suggested_file_name,
            blobs: self.blobs,
            total_length: self.total_length,
        })
    }
}
