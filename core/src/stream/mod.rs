// ## 1️⃣ `mod.rs`: public façade + re-exports

//! stream: input bytes to encrypted, content-addressed blobs plus a
//! descriptor whose hash identifies the stream.
//!
//! Layering, leaves first: chunking → unit_worker → descriptor → io →
//! pipeline → core.

pub mod chunking;
pub mod unit_worker;
pub mod descriptor;
pub mod io;
pub mod parallelism;
pub mod state;
pub mod pipeline;
pub mod core;

pub use io::InputSource;
pub use parallelism::ParallelismProfile;
pub use state::{CancelToken, StreamLifecycle, StreamState};

pub use self::core::{create_stream, CreatedStream, StreamCreator};
