// ## 2️⃣ `core.rs`: stable public API

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::constants::max_unit_len;
use crate::crypto::{BlockCipherImpl, Iv, IvSupplier, StreamHash, StreamKey};
use crate::session::SessionContext;
use crate::storage::BlobStore;
use crate::stream::descriptor::{encode_descriptor, DescriptorBuilder, StreamDescriptor, StreamName};
use crate::stream::io::{open_input, InputSource};
use crate::stream::pipeline::{run_create_pipeline, PipelineContext};
use crate::stream::state::{CancelToken, StreamLifecycle, StreamState};
use crate::stream::unit_worker::UnitContext;
use crate::telemetry::{Stage, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;
use crate::utils::expected_record_count;

/// Result of a successful `StreamCreator::create`.
#[derive(Debug, Clone)]
pub struct CreatedStream {
    pub stream_hash: StreamHash,
    pub descriptor: StreamDescriptor,
    pub telemetry: TelemetrySnapshot,
}

/// Creates streams against one session and one store.
pub struct StreamCreator<'a> {
    session: &'a SessionContext,
    store: &'a dyn BlobStore,
    config: PipelineConfig,
    cancel: CancelToken,
}

impl<'a> StreamCreator<'a> {
    pub fn new(session: &'a SessionContext, store: &'a dyn BlobStore) -> Self {
        Self {
            session,
            store,
            config: PipelineConfig::default(),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle that cancels any stream this creator is working on.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Encrypt `input` into blobs, persist them and the descriptor, and
    /// return the stream hash with the descriptor and telemetry.
    ///
    /// Configuration and key length are checked before any input is read.
    /// When the input length is known (memory, regular file) every IV the
    /// stream needs is drawn up front, so an exhausted supplier fails before
    /// any blob is persisted. For `InputSource::Reader` IVs are drawn as units
    /// are read. On failure, blobs already persisted stay in the store.
    pub fn create(
        &self,
        stream_name: &StreamName,
        suggested_file_name: Option<StreamName>,
        input: InputSource,
        key: &StreamKey,
        ivs: IvSupplier,
    ) -> Result<CreatedStream, StreamError> {
        self.config.validate()?;
        let suite = self.session.cipher().validate()?;
        let cipher = BlockCipherImpl::from_suite_and_key(suite, key)?;

        let ivs = match input.known_len() {
            Some(len) => {
                let records = expected_record_count(len, max_unit_len(self.config.blob_size));
                debug!(len, records, "drawing IVs up front");
                ivs.prefetch(records).inspect_err(|e| {
                    warn!(stream_name = %stream_name, error = %e, "not enough IVs for input");
                })?
            }
            None => ivs,
        };

        let mut lifecycle = StreamLifecycle::new();
        let mut timer = TelemetryTimer::new();

        let result = self.run(stream_name, suggested_file_name, input, key, cipher, &ivs, &mut lifecycle, &mut timer);
        if let Err(e) = &result {
            lifecycle.fail();
            warn!(stream_name = %stream_name, error = %e, "stream creation failed");
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn run(
        &self,
        stream_name: &StreamName,
        suggested_file_name: Option<StreamName>,
        input: InputSource,
        key: &StreamKey,
        cipher: BlockCipherImpl,
        ivs: &IvSupplier,
        lifecycle: &mut StreamLifecycle,
        timer: &mut TelemetryTimer,
    ) -> Result<CreatedStream, StreamError> {
        let reader = open_input(input)?;
        lifecycle.advance(StreamState::Chunking)?;

        let pipe = PipelineContext {
            unit: UnitContext {
                cipher,
                skip_existing: self.config.skip_existing_blobs,
            },
            store: self.store,
            ivs,
            unit_len: max_unit_len(self.config.blob_size),
            profile: self.config.profile(),
            cancel: self.cancel.clone(),
        };
        let builder = DescriptorBuilder::new(stream_name.clone(), key.clone(), suggested_file_name);
        let output = run_create_pipeline(reader, builder, &pipe, lifecycle)?;
        timer.stage_times.merge(&output.stage_times);

        // ---- Describe ----
        let start = Instant::now();
        let descriptor = output.descriptor;
        lifecycle.advance(StreamState::DescriptorBuilt)?;

        let stream_hash = descriptor.stream_hash();
        lifecycle.advance(StreamState::Hashed)?;

        let document = encode_descriptor(&descriptor)?;
        self.cancel.check()?;
        self.store.put_descriptor(&stream_hash, &document)?;
        debug!(%stream_hash, bytes = document.len(), "descriptor persisted");
        timer.add_stage_time(Stage::Describe, start.elapsed());

        lifecycle.advance(StreamState::Done)?;
        timer.finish();

        let telemetry = TelemetrySnapshot::from(&output.counters, timer);
        info!(
            %stream_hash,
            stream_name = %stream_name,
            blobs = telemetry.units_data,
            bytes = descriptor.total_length(),
            "stream created"
        );

        Ok(CreatedStream {
            stream_hash,
            descriptor,
            telemetry,
        })
    }
}

/// Single-call entry point: canonicalize `filename`, encrypt `input` with
/// `key` and the IVs from `ivs`, persist everything to `store`, and return
/// the stream hash.
///
/// ```no_run
/// use std::iter::repeat;
/// use cryptstream_core::prelude::*;
///
/// let session = SessionContext::scratch(CipherConfig::default())?;
/// let store = InMemoryBlobStore::new();
/// let hash = create_stream(
///     &session,
///     &store,
///     "test.file",
///     InputSource::Memory(vec![b'1'; 3 * 1024 * 1024]),
///     &[b'2'; 16],
///     repeat([b'3'; 16]),
/// )?;
/// println!("{hash}");
/// # Ok::<(), StreamError>(())
/// ```
pub fn create_stream<I>(
    session: &SessionContext,
    store: &dyn BlobStore,
    filename: &str,
    input: InputSource,
    key: &[u8],
    ivs: I,
) -> Result<StreamHash, StreamError>
where
    I: IntoIterator<Item = Iv>,
    I::IntoIter: Send + 'static,
{
    let stream_name = StreamName::new(filename)?;
    let created = StreamCreator::new(session, store).create(
        &stream_name,
        None,
        input,
        &StreamKey::from(key),
        IvSupplier::new(ivs),
    )?;
    Ok(created.stream_hash)
}
