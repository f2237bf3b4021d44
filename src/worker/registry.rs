use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::core::WorkerId;

/// Hands out worker ids and counts the workers whose loop is running.
///
/// Shared by the workers that were built with it; there is no process-wide
/// state, so independent pools never see each other's workers.
#[derive(Debug, Default)]
pub struct WorkerRegistry {
    last_id: AtomicU64,
    running: AtomicUsize,
}

impl WorkerRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Next unused id, starting at 1.
    pub fn next_id(&self) -> WorkerId {
        WorkerId(self.last_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Number of worker loops currently running.
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// Marks a loop as running until the returned guard is dropped.
    pub(crate) fn enter(self: &Arc<Self>) -> RunningGuard {
        self.running.fetch_add(1, Ordering::SeqCst);
        RunningGuard {
            registry: Arc::clone(self),
        }
    }
}

pub(crate) struct RunningGuard {
    registry: Arc<WorkerRegistry>,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.registry.running.fetch_sub(1, Ordering::SeqCst);
    }
}
