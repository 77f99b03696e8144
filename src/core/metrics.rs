//! Handler metrics for observability
//!
//! Provides counters for monitoring handler health, including filtered
//! records, sink write failures and throughput.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for one handler
///
/// Logging calls never report sink failures to the caller, so these counters
/// are the place to look when output goes missing.
///
/// # Example
///
/// ```
/// use rust_slog::HandlerMetrics;
///
/// let metrics = HandlerMetrics::new();
///
/// metrics.record_handled();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.handled(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct HandlerMetrics {
    /// Records that passed the threshold and were rendered
    handled: AtomicU64,

    /// Records rejected by the threshold
    filtered: AtomicU64,

    /// Bytes accepted by sinks
    bytes_written: AtomicU64,

    /// Sink writes that returned an error or wrote short
    write_failures: AtomicU64,

    /// Sink writes that panicked
    sink_panics: AtomicU64,
}

impl HandlerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            handled: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            sink_panics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_panics(&self) -> u64 {
        self.sink_panics.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handled(&self) -> u64 {
        self.handled.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_bytes(&self, bytes: usize) -> u64 {
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed)
    }

    /// Record a failed sink write, returning the previous failure count
    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a panicking sink; a panic also counts as a write failure
    #[inline]
    pub fn record_sink_panic(&self) -> u64 {
        self.sink_panics.fetch_add(1, Ordering::Relaxed);
        self.record_write_failure()
    }

    /// Failed sink writes per handled record, as a percentage
    ///
    /// Returns 0.0 if nothing has been handled. With several sinks per
    /// handler the value can exceed 100.
    pub fn failure_rate(&self) -> f64 {
        let handled = self.handled() as f64;
        if handled == 0.0 {
            0.0
        } else {
            (self.write_failures() as f64 / handled) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.handled.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.sink_panics.store(0, Ordering::Relaxed);
    }
}

impl Default for HandlerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for HandlerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            handled: AtomicU64::new(self.handled()),
            filtered: AtomicU64::new(self.filtered()),
            bytes_written: AtomicU64::new(self.bytes_written()),
            write_failures: AtomicU64::new(self.write_failures()),
            sink_panics: AtomicU64::new(self.sink_panics()),
        }
    }
}
