// # 📂 src/stream/pipeline.rs

// ## 📂 File: `src/stream/pipeline.rs`
// ## Pure pipeline wiring (no crypto logic)

use std::io::Read;
use std::thread;
use std::time::Instant;

use crossbeam::channel::{bounded, Sender};
use tracing::{debug, trace};

use crate::crypto::IvSupplier;
use crate::storage::BlobStore;
use crate::stream::chunking::Chunker;
use crate::stream::descriptor::{DescriptorBuilder, StreamDescriptor};
use crate::stream::io::OrderedRecordCollector;
use crate::stream::parallelism::ParallelismProfile;
use crate::stream::state::{CancelToken, StreamLifecycle};
use crate::stream::unit_worker::{EncryptUnitWorker, UnitContext, UnitInput, UnitOutcome};
use crate::telemetry::{Stage, StageTimes, TelemetryCounters};
use crate::types::StreamError;

/// Everything the pipeline borrows for one stream.
pub struct PipelineContext<'a> {
    pub unit: UnitContext,
    pub store: &'a dyn BlobStore,
    pub ivs: &'a IvSupplier,
    /// Maximum plaintext bytes per unit.
    pub unit_len: usize,
    pub profile: ParallelismProfile,
    pub cancel: CancelToken,
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub descriptor: StreamDescriptor,
    pub counters: TelemetryCounters,
    pub stage_times: StageTimes,
}

// ============================================================
// Create pipeline
// ============================================================
//
// reader ──unit_tx──▶ workers (N) ──out_tx──▶ collector (calling thread)
//   │                                              ▲
//   └───────────── read errors ────────────────────┘
//
// IVs are drawn by the reader in sequence order. Blobs are persisted inside
// the workers. The collector reorders completions and owns the descriptor.
// The first error wins; it cancels `abort` so the other stages wind down.
pub fn run_create_pipeline<R>(
    reader: R,
    builder: DescriptorBuilder,
    pipe: &PipelineContext<'_>,
    lifecycle: &mut StreamLifecycle,
) -> Result<PipelineOutput, StreamError>
where
    R: Read + Send,
{
    let abort = pipe.cancel.child();
    debug!(workers = pipe.profile.workers, inflight = pipe.profile.inflight_units, "start create pipeline");

    thread::scope(|scope| {
        // ---- Channels ----
        let (unit_tx, unit_rx) = bounded::<UnitInput>(pipe.profile.inflight_units);
        let (out_tx, out_rx) = bounded::<Result<UnitOutcome, StreamError>>(pipe.profile.inflight_units);

        // ---- Reader thread (chunker + IV assignment) ----
        let reader_out = out_tx.clone();
        let reader_abort = abort.clone();
        let (unit_len, ivs) = (pipe.unit_len, pipe.ivs);
        let reader_handle = scope.spawn(move || {
            let mut read_times = StageTimes::default();
            if let Err(e) = read_units(reader, unit_len, ivs, unit_tx, &reader_abort, &mut read_times) {
                trace!(error = %e, "reader failed");
                // Collector may already be gone.
                let _ = reader_out.send(Err(e));
            }
            read_times
        });

        // ---- Workers ----
        for i in 0..pipe.profile.workers {
            let worker = EncryptUnitWorker::new(pipe.unit.clone(), pipe.store, abort.clone());
            let rx = unit_rx.clone();
            let tx = out_tx.clone();
            scope.spawn(move || {
                trace!(worker = i, "worker starting");
                worker.run(rx, tx);
                trace!(worker = i, "worker finished");
            });
        }

        // Only the spawned stages hold channel ends from here on.
        drop(unit_rx);
        drop(out_tx);

        // ---- Ordered collector ----
        let mut collector = OrderedRecordCollector::new(builder, lifecycle);

        for res in out_rx.iter() {
            if pipe.cancel.is_cancelled() {
                abort.cancel();
                return Err(StreamError::Cancelled);
            }
            let pushed = res.and_then(|outcome| collector.push(outcome));
            if let Err(e) = pushed {
                abort.cancel();
                return Err(e);
            }
        }
        pipe.cancel.check()?;

        let read_times = reader_handle
            .join()
            .map_err(|_| StreamError::Pipeline("reader thread panicked"))?;

        debug!(units = collector.delivered(), "all units collected");
        let (descriptor, counters, mut stage_times) = collector.finish()?;
        stage_times.merge(&read_times);

        Ok(PipelineOutput {
            descriptor,
            counters,
            stage_times,
        })
    })
}

/// Reader stage: chunk, assign IVs in order, dispatch. Ends with the terminator.
fn read_units<R: Read>(
    reader: R,
    unit_len: usize,
    ivs: &IvSupplier,
    unit_tx: Sender<UnitInput>,
    abort: &CancelToken,
    read_times: &mut StageTimes,
) -> Result<(), StreamError> {
    let send = |input: UnitInput| {
        unit_tx
            .send(input)
            .map_err(|_| StreamError::Pipeline("unit channel closed"))
    };

    let mut chunker = Chunker::new(reader, unit_len);
    let mut terminator_index = 0u64;

    loop {
        abort.check()?;

        let start = Instant::now();
        let unit = match chunker.next() {
            Some(unit) => unit?,
            None => break,
        };
        read_times.add(Stage::Read, start.elapsed());

        // Empty input: the single empty unit becomes the terminator.
        if unit.is_empty() {
            break;
        }

        let iv = ivs.next_iv()?;
        trace!(sequence_index = unit.sequence_index, len = unit.len(), "dispatching unit");
        terminator_index = unit.sequence_index + 1;
        send(UnitInput::data(unit.sequence_index, unit.bytes, iv))?;
    }

    abort.check()?;
    let iv = ivs.next_iv()?;
    trace!(sequence_index = terminator_index, "dispatching terminator");
    send(UnitInput::terminator(terminator_index, iv))?;

    Ok(())
}
