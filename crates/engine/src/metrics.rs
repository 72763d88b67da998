use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Cheap shared counters for one run. Cloning hands out another handle to
/// the same counters.
#[derive(Debug, Clone, Default)]
pub struct FetchMetrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Default)]
struct InnerMetrics {
    rows_emitted: AtomicU64,
    items_ignored: AtomicU64,
    pages_fetched: AtomicU64,
    items_created: AtomicU64,
}

impl FetchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_row(&self) {
        self.inner.rows_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored(&self) {
        self.inner.items_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page(&self) {
        self.inner.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_created(&self) {
        self.inner.items_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rows_emitted: self.inner.rows_emitted.load(Ordering::Relaxed),
            items_ignored: self.inner.items_ignored.load(Ordering::Relaxed),
            pages_fetched: self.inner.pages_fetched.load(Ordering::Relaxed),
            items_created: self.inner.items_created.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub rows_emitted: u64,
    pub items_ignored: u64,
    pub pages_fetched: u64,
    pub items_created: u64,
}
