use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::StatusCode;

use crate::dispatcher::{handler_fn, Handler};

/// Request counters collected by a wrap middleware.
///
/// All counters use atomic operations so one instance can be shared by every
/// thread dispatching requests.
#[derive(Debug, Default)]
pub struct RequestMetrics {
    request_count: AtomicUsize,
    aborted_count: AtomicUsize,
    not_found_count: AtomicUsize,
    total_latency_ns: AtomicU64,
}

impl RequestMetrics {
    /// Create a metrics collector with all counters initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests processed
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Requests whose chain was aborted
    #[must_use]
    pub fn aborted_count(&self) -> usize {
        self.aborted_count.load(Ordering::Relaxed)
    }

    /// Requests that finished with status 404
    #[must_use]
    pub fn not_found_count(&self) -> usize {
        self.not_found_count.load(Ordering::Relaxed)
    }

    /// Calculate the average request latency
    ///
    /// Returns zero duration if no requests have been processed yet.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    fn record(&self, status: StatusCode, aborted: bool, latency: Duration) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        if aborted {
            self.aborted_count.fetch_add(1, Ordering::Relaxed);
        }
        if status == StatusCode::NOT_FOUND {
            self.not_found_count.fetch_add(1, Ordering::Relaxed);
        }
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.total_latency_ns.fetch_add(nanos, Ordering::Relaxed);
    }

    /// A middleware handler feeding this collector.
    #[must_use]
    pub fn handler(self: &Arc<Self>) -> Handler {
        let metrics = Arc::clone(self);
        handler_fn(move |ctx| {
            let start = Instant::now();
            ctx.next();
            metrics.record(ctx.status(), ctx.is_aborted(), start.elapsed());
        })
    }
}
