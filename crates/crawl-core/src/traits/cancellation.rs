//! Stop request shared between the engine and whoever wants it to stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Something a traversal can be asked to stop through.
///
/// The engine polls `is_cancelled` before starting each round. A round that
/// is already running always finishes, so a stop never leaves a half-merged
/// frontier behind.
pub trait Cancellable {
    fn is_cancelled(&self) -> bool;

    /// Idempotent.
    fn cancel(&self);
}

/// One-way stop flag.
///
/// Clones share the flag: the binary hands a clone to its Ctrl-C task and
/// the engine keeps the other. Once set it is never cleared; a new traversal
/// needs a new token.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    stop_requested: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }
}
