// # 📂 `src/stream/unit_worker/encrypt.rs`

use std::time::Instant;

use crossbeam::channel::{Receiver, Sender};
use tracing::{debug, trace};

use crate::crypto::{blob_hash, padded_len};
use crate::storage::BlobStore;
use crate::stream::descriptor::BlobRecord;
use crate::stream::state::CancelToken;
use crate::telemetry::{Stage, StageTimes, TelemetryCounters};
use crate::types::StreamError;

use super::types::{UnitContext, UnitInput, UnitKind, UnitOutcome};

/// Encrypt → identify → persist, one unit at a time.
pub struct EncryptUnitWorker<'s> {
    ctx: UnitContext,
    store: &'s dyn BlobStore,
    cancel: CancelToken,
}

impl<'s> EncryptUnitWorker<'s> {
    pub fn new(ctx: UnitContext, store: &'s dyn BlobStore, cancel: CancelToken) -> Self {
        Self { ctx, store, cancel }
    }

    /// Run loop: consumes units until the input channel closes, the
    /// collector goes away, the stream is cancelled, or a unit fails.
    pub fn run(self, rx: Receiver<UnitInput>, tx: Sender<Result<UnitOutcome, StreamError>>) {
        for input in rx.iter() {
            if self.cancel.is_cancelled() {
                trace!("worker observed cancellation");
                return;
            }

            let result = self.process(&input);
            let failed = result.is_err();
            if tx.send(result).is_err() {
                trace!("collector gone, worker exiting");
                return;
            }
            if failed {
                return;
            }
        }
    }

    pub fn process(&self, input: &UnitInput) -> Result<UnitOutcome, StreamError> {
        let mut counters = TelemetryCounters::default();
        let mut stage_times = StageTimes::default();

        if input.kind == UnitKind::Terminator {
            debug_assert!(input.plaintext.is_empty());
            counters.add_terminator();
            trace!(sequence_index = input.sequence_index, "terminator");
            return Ok(UnitOutcome {
                record: BlobRecord::terminator(input.sequence_index, input.iv),
                plaintext_len: 0,
                counters,
                stage_times,
            });
        }

        // Encrypt
        let start = Instant::now();
        let ciphertext = self.ctx.cipher.encrypt_unit(&input.iv, &input.plaintext);
        debug_assert_eq!(ciphertext.len(), padded_len(input.plaintext.len()));
        stage_times.add(Stage::Encrypt, start.elapsed());

        // Identify
        let start = Instant::now();
        let hash = blob_hash(&ciphertext);
        stage_times.add(Stage::Digest, start.elapsed());

        // Persist
        let start = Instant::now();
        if self.ctx.skip_existing && self.store.has_blob(&hash) {
            trace!(sequence_index = input.sequence_index, blob_hash = %hash, "blob already stored, skipping");
            counters.add_deduplicated();
        } else {
            self.store.put_blob(&hash, &ciphertext)?;
            counters.add_persisted();
        }
        stage_times.add(Stage::Persist, start.elapsed());

        counters.add_data(input.plaintext.len(), ciphertext.len());
        debug!(
            sequence_index = input.sequence_index,
            blob_hash = %hash,
            length = ciphertext.len(),
            "unit done"
        );

        Ok(UnitOutcome {
            record: BlobRecord::data(input.sequence_index, hash, input.iv, ciphertext.len() as u64),
            plaintext_len: input.plaintext.len() as u64,
            counters,
            stage_times,
        })
    }
}
