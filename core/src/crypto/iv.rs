// ## 📂 File: `src/crypto/iv.rs`

//! IV supplier.
//!
//! Design:
//! - IVs are an injected, ordered sequence. The pipeline never invents one.
//! - Production passes `RandomIvs`; tests pass a fixed sequence so stream
//!   hashes are reproducible.
//! - One mutual-exclusion point around "fetch next IV". The pipeline draws
//!   IVs from its single reader stage in unit order, so unit `i` always gets
//!   the `i`-th IV no matter how workers are scheduled.
//!
//! Security notes:
//! - Each IV must be unique within one stream. Constant sequences are for
//!   fixtures only.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::types::{CryptoError, Iv};

type IvIter = Box<dyn Iterator<Item = Iv> + Send>;

/// Sequential, thread-safe IV source for one stream.
pub struct IvSupplier {
    inner: Mutex<IvIter>,
    issued: AtomicU64,
}

impl IvSupplier {
    /// Wrap any ordered IV sequence.
    pub fn new<I>(ivs: I) -> Self
    where
        I: IntoIterator<Item = Iv>,
        I::IntoIter: Send + 'static,
    {
        Self {
            inner: Mutex::new(Box::new(ivs.into_iter())),
            issued: AtomicU64::new(0),
        }
    }

    /// OS-random IVs.
    pub fn random() -> Self {
        Self::new(RandomIvs)
    }

    /// Next IV, or `IvExhausted` once the sequence ends.
    pub fn next_iv(&self) -> Result<Iv, CryptoError> {
        let mut ivs = self.inner.lock().map_err(|_| CryptoError::IvSupplierPoisoned)?;
        match ivs.next() {
            Some(iv) => {
                self.issued.fetch_add(1, Ordering::Relaxed);
                Ok(iv)
            }
            None => Err(CryptoError::IvExhausted {
                issued: self.issued.load(Ordering::Relaxed),
            }),
        }
    }

    /// Draw the next `count` IVs now. The returned supplier hands those out
    /// first and then continues with the rest of the sequence; its `issued`
    /// counter starts again at zero.
    pub fn prefetch(self, count: u64) -> Result<Self, CryptoError> {
        let mut drawn = Vec::with_capacity(count.min(4096) as usize);
        for _ in 0..count {
            drawn.push(self.next_iv()?);
        }
        let rest = self.inner.into_inner().map_err(|_| CryptoError::IvSupplierPoisoned)?;
        Ok(Self {
            inner: Mutex::new(Box::new(drawn.into_iter().chain(rest))),
            issued: AtomicU64::new(0),
        })
    }

    /// Number of IVs handed out so far.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for IvSupplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IvSupplier").field("issued", &self.issued()).finish()
    }
}

/// Endless OS-random IV sequence.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIvs;

impl Iterator for RandomIvs {
    type Item = Iv;

    fn next(&mut self) -> Option<Iv> {
        let mut iv = Iv::default();
        OsRng.fill_bytes(&mut iv);
        Some(iv)
    }
}
