// ## 📂 File: `src/stream/state.rs`

//! Per-stream lifecycle and cancellation.
//!
//! ```text
//! Pending → Chunking → Encrypting(0) → … → Encrypting(n) → DescriptorBuilt → Hashed → Done
//!    └──────────┴─────────────┴──────────────────┴──────────────┴─────────────┴──→ Failed
//! ```
//!
//! `Done` and `Failed` are terminal.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::types::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Pending,
    Chunking,
    /// Records `0..=i` have reached the descriptor builder.
    Encrypting(u64),
    DescriptorBuilt,
    Hashed,
    Done,
    Failed,
}

impl StreamState {
    pub fn is_terminal(self) -> bool {
        matches!(self, StreamState::Done | StreamState::Failed)
    }

    /// Whether `self → next` is a legal transition.
    pub fn can_advance_to(self, next: StreamState) -> bool {
        use StreamState::*;
        match (self, next) {
            (Done, _) | (Failed, _) => false,
            (_, Failed) => true,
            (Pending, Chunking) => true,
            (Chunking, Encrypting(0)) => true,
            (Encrypting(i), Encrypting(j)) => Some(j) == i.checked_add(1),
            (Encrypting(_), DescriptorBuilt) => true,
            (DescriptorBuilt, Hashed) => true,
            (Hashed, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamState::Pending => f.write_str("pending"),
            StreamState::Chunking => f.write_str("chunking"),
            StreamState::Encrypting(i) => write!(f, "encrypting({i})"),
            StreamState::DescriptorBuilt => f.write_str("descriptor_built"),
            StreamState::Hashed => f.write_str("hashed"),
            StreamState::Done => f.write_str("done"),
            StreamState::Failed => f.write_str("failed"),
        }
    }
}

/// Lifecycle of one `create_stream` call.
#[derive(Debug)]
pub struct StreamLifecycle {
    state: StreamState,
}

impl Default for StreamLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamLifecycle {
    pub fn new() -> Self {
        Self {
            state: StreamState::Pending,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn advance(&mut self, next: StreamState) -> Result<(), StreamError> {
        if !self.state.can_advance_to(next) {
            return Err(StreamError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!(from = %self.state, to = %next, "stream state");
        self.state = next;
        Ok(())
    }

    /// Move to `Failed` unless already terminal.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            debug!(from = %self.state, "stream failed");
            self.state = StreamState::Failed;
        }
    }
}

/// Cooperative cancellation flag.
///
/// A child token observes its own flag and every ancestor's; cancelling a
/// child leaves the parent untouched.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    ancestors: Vec<Arc<AtomicBool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(Arc::clone(&self.flag));
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            ancestors,
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst) || self.ancestors.iter().any(|a| a.load(Ordering::SeqCst))
    }

    /// `Err(Cancelled)` once cancelled.
    pub fn check(&self) -> Result<(), StreamError> {
        if self.is_cancelled() {
            Err(StreamError::Cancelled)
        } else {
            Ok(())
        }
    }
}
