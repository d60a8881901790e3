//! Request counters owned by [`AppState`](crate::state::AppState).

use std::sync::atomic::{AtomicU64, Ordering};

/// Counts requests served by the static file server under `/app`.
#[derive(Debug, Default)]
pub struct FileserverMetrics {
    hits: AtomicU64,
}

impl FileserverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}
