//! Handler: threshold + formatter + sinks

use super::{
    error::{LoggerError, Result},
    formatter::Formatter,
    log_level::Level,
    metrics::HandlerMetrics,
    record::Record,
    sink::Sink,
};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Diagnostics go to stderr on the first failure and then every Nth one
const ALERT_INTERVAL: u64 = 1000;

/// Binds a minimum level, a compiled [`Formatter`] and an ordered list of
/// [`Sink`]s.
///
/// Sinks are added during setup; [`handle`](Handler::handle) only needs
/// `&self`, so a configured handler can be used from many threads at once.
///
/// # Example
///
/// ```
/// use rust_slog::prelude::*;
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let handler = Handler::new(Level::Info, Formatter::parse("%l %m"))
///     .with_shared_sink(sink.clone());
///
/// handler.handle(&Record::new(Level::Info, "hello", &[]));
/// handler.handle(&Record::new(Level::Debug, "dropped", &[]));
/// assert_eq!(sink.contents(), "I hello\n");
/// ```
pub struct Handler {
    threshold: Level,
    formatter: Arc<Formatter>,
    sinks: Vec<Arc<dyn Sink>>,
    metrics: HandlerMetrics,
}

impl Handler {
    #[must_use]
    pub fn new(threshold: Level, formatter: impl Into<Arc<Formatter>>) -> Self {
        Self {
            threshold,
            formatter: formatter.into(),
            sinks: Vec::new(),
            metrics: HandlerMetrics::new(),
        }
    }

    pub fn add_sink(&mut self, sink: Arc<dyn Sink>) {
        self.sinks.push(sink);
    }

    /// Add a sink owned by this handler
    #[must_use = "builder methods return a new value"]
    pub fn with_sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Add a sink that may also be attached to other handlers
    #[must_use = "builder methods return a new value"]
    pub fn with_shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    #[inline]
    pub fn threshold(&self) -> Level {
        self.threshold
    }

    pub fn formatter(&self) -> &Arc<Formatter> {
        &self.formatter
    }

    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        &self.sinks
    }

    pub fn metrics(&self) -> &HandlerMetrics {
        &self.metrics
    }

    #[inline]
    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.threshold
    }

    /// Render `record` and write it to every sink.
    ///
    /// Records below the threshold are ignored. A failing or panicking sink
    /// is counted in [`metrics`](Handler::metrics) and skipped; the remaining
    /// sinks are still written and nothing is reported to the caller.
    pub fn handle(&self, record: &Record<'_>) {
        if !self.is_enabled(record.level()) {
            self.metrics.record_filtered();
            return;
        }

        let mut buf = Vec::with_capacity(256);
        self.formatter.format(record, &mut buf);
        self.metrics.record_handled();
        if buf.is_empty() {
            return;
        }

        for (idx, sink) in self.sinks.iter().enumerate() {
            let write_result = catch_unwind(AssertUnwindSafe(|| sink.write(&buf)));

            match write_result {
                Ok(Ok(written)) if written == buf.len() => {
                    self.metrics.record_bytes(written);
                }
                Ok(Ok(written)) => {
                    self.metrics.record_bytes(written);
                    let err = LoggerError::short_write(sink.name(), written, buf.len());
                    self.report_failure(idx, sink.as_ref(), &err);
                }
                Ok(Err(e)) => {
                    self.report_failure(idx, sink.as_ref(), &e);
                }
                Err(panic_info) => {
                    let previous = self.metrics.record_sink_panic();
                    if should_alert(previous) {
                        eprintln!(
                            "[LOGGER CRITICAL] Sink #{} '{}' panicked: {}. \
                             Other sinks continue to function.",
                            idx,
                            sink.name(),
                            panic_message(panic_info.as_ref())
                        );
                    }
                }
            }
        }
    }

    fn report_failure(&self, idx: usize, sink: &dyn Sink, err: &LoggerError) {
        let previous = self.metrics.record_write_failure();
        if should_alert(previous) {
            eprintln!(
                "[LOGGER ERROR] Sink #{} '{}' write failed ({} failures so far): {}",
                idx,
                sink.name(),
                previous + 1,
                err
            );
        }
    }

    /// Flush every sink in order.
    ///
    /// A failing or panicking sink does not stop the remaining sinks from
    /// being flushed; the failures are collected into
    /// [`LoggerError::FlushFailed`].
    pub fn flush(&self) -> Result<()> {
        let mut failures = Vec::new();

        for sink in &self.sinks {
            match catch_unwind(AssertUnwindSafe(|| sink.flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failures.push(e),
                Err(panic_info) => failures.push(LoggerError::sink_panicked(
                    sink.name(),
                    panic_message(panic_info.as_ref()),
                )),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::flush_failed(failures))
        }
    }

    /// Close every sink in order.
    ///
    /// All sinks are attempted even when some fail; the failures are
    /// collected into [`LoggerError::CloseFailed`].
    pub fn close(&self) -> Result<()> {
        let mut failures = Vec::new();

        for sink in &self.sinks {
            match catch_unwind(AssertUnwindSafe(|| sink.close())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failures.push(e),
                Err(panic_info) => failures.push(LoggerError::sink_panicked(
                    sink.name(),
                    panic_message(panic_info.as_ref()),
                )),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::close_failed(failures))
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sinks: Vec<&str> = self.sinks.iter().map(|s| s.name()).collect();
        f.debug_struct("Handler")
            .field("threshold", &self.threshold)
            .field("formatter", &self.formatter)
            .field("sinks", &sinks)
            .finish()
    }
}

#[inline]
fn should_alert(previous_failures: u64) -> bool {
    previous_failures == 0 || (previous_failures + 1) % ALERT_INTERVAL == 0
}

pub(crate) fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
