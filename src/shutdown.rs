//! Cooperative stop flag for a flatten run.
//!
//! The ctrlc handler installed by the binary calls `request()`; the
//! orchestrator calls `check()` before each entry so an interrupted run ends
//! between two whole-file moves, never in the middle of one.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::FlattenError;

static STOP: AtomicBool = AtomicBool::new(false);

/// Ask the current run to stop after the entry in progress. Signal-safe.
#[inline]
pub fn request() {
    STOP.store(true, Ordering::Relaxed);
}

#[inline]
pub fn is_requested() -> bool {
    STOP.load(Ordering::Relaxed)
}

/// `Err(Interrupted)` once a stop was requested.
pub fn check() -> Result<(), FlattenError> {
    if is_requested() {
        Err(FlattenError::Interrupted)
    } else {
        Ok(())
    }
}

/// Clear the flag (tests and embedders running several flattens in one process).
#[inline]
pub fn reset() {
    STOP.store(false, Ordering::Relaxed);
}
