//! Cooperative cancellation.
//!
//! The engine polls the host's token once per file it enters during a scan.
//! A search never observes a token more often than that, so a host may back
//! it with anything from an atomic to an LSP request id lookup.

use crate::error::{FindReferencesError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub trait CancellationToken {
    fn is_cancellation_requested(&self) -> bool;
}

/// A token that never fires.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancelled;

impl CancellationToken for NeverCancelled {
    fn is_cancellation_requested(&self) -> bool {
        false
    }
}

/// A shareable flag. Clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct AtomicCancellationToken {
    flag: Arc<AtomicBool>,
}

impl AtomicCancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl CancellationToken for AtomicCancellationToken {
    fn is_cancellation_requested(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Outcome of one cancellation poll inside a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStep {
    Continue,
    Cancelled,
}

impl ScanStep {
    pub fn poll(token: &dyn CancellationToken) -> ScanStep {
        if token.is_cancellation_requested() {
            ScanStep::Cancelled
        } else {
            ScanStep::Continue
        }
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            ScanStep::Continue => Ok(()),
            ScanStep::Cancelled => Err(FindReferencesError::Cancelled),
        }
    }
}
