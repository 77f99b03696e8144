//! Main logger implementation

use super::{
    error::{LoggerError, Result},
    handler::Handler,
    log_level::Level,
    record::Record,
};
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};

/// Fans each record out to an ordered list of [`Handler`]s.
///
/// Every handler re-checks its own threshold, so one call site can feed a
/// verbose file handler and a quiet console handler at the same time.
///
/// Each level has two entry points: a plain form (`info`) that joins its
/// arguments with spaces, and a templated form (`infof`) that substitutes
/// them into a printf-style template.
///
/// # Example
///
/// ```
/// use rust_slog::prelude::*;
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let logger = Logger::builder()
///     .handler(Handler::new(Level::Info, Formatter::parse("%l %m")).with_shared_sink(sink.clone()))
///     .build();
///
/// logger.infof("user %v logged in", &[&42]);
/// logger.info(&[&"plain", &1]);
/// logger.debug(&[&"filtered"]);
///
/// assert_eq!(sink.contents(), "I user 42 logged in\nI plain 1\n");
/// ```
pub struct Logger {
    handlers: Vec<Handler>,
    closed: AtomicBool,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn add_handler(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    /// Lowest threshold among the handlers, or `None` without handlers
    pub fn min_level(&self) -> Option<Level> {
        self.handlers.iter().map(Handler::threshold).min()
    }

    /// True when at least one handler admits `level`
    pub fn is_enabled(&self, level: Level) -> bool {
        self.min_level().is_some_and(|min| level >= min)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Build a record stamped with the current time and pass it to every
    /// handler in order
    pub fn log(&self, level: Level, message: &str, args: &[&dyn Display]) {
        self.log_record(&Record::new(level, message, args));
    }

    /// Pass an already built record to every handler in order
    pub fn log_record(&self, record: &Record<'_>) {
        if self.is_closed() {
            return;
        }
        for handler in &self.handlers {
            handler.handle(record);
        }
    }

    #[inline]
    pub fn debug(&self, args: &[&dyn Display]) {
        self.log(Level::Debug, "", args);
    }

    #[inline]
    pub fn debugf(&self, message: &str, args: &[&dyn Display]) {
        self.log(Level::Debug, message, args);
    }

    #[inline]
    pub fn info(&self, args: &[&dyn Display]) {
        self.log(Level::Info, "", args);
    }

    #[inline]
    pub fn infof(&self, message: &str, args: &[&dyn Display]) {
        self.log(Level::Info, message, args);
    }

    #[inline]
    pub fn warn(&self, args: &[&dyn Display]) {
        self.log(Level::Warn, "", args);
    }

    #[inline]
    pub fn warnf(&self, message: &str, args: &[&dyn Display]) {
        self.log(Level::Warn, message, args);
    }

    #[inline]
    pub fn error(&self, args: &[&dyn Display]) {
        self.log(Level::Error, "", args);
    }

    #[inline]
    pub fn errorf(&self, message: &str, args: &[&dyn Display]) {
        self.log(Level::Error, message, args);
    }

    #[inline]
    pub fn crit(&self, args: &[&dyn Display]) {
        self.log(Level::Crit, "", args);
    }

    #[inline]
    pub fn critf(&self, message: &str, args: &[&dyn Display]) {
        self.log(Level::Crit, message, args);
    }

    /// Flush every sink of every handler.
    ///
    /// All handlers are flushed even if some fail, and their failures are
    /// merged into one [`LoggerError::FlushFailed`].
    pub fn flush(&self) -> Result<()> {
        let mut failures = Vec::new();
        for handler in &self.handlers {
            if let Err(e) = handler.flush() {
                match e {
                    LoggerError::FlushFailed { failures: inner } => failures.extend(inner),
                    other => failures.push(other.to_string()),
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::FlushFailed { failures })
        }
    }

    /// Close every handler in order.
    ///
    /// All handlers are closed even if some fail, and their failures are
    /// merged into one [`LoggerError::CloseFailed`]. Closing twice is a
    /// no-op, and later logging calls are ignored.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let mut failures = Vec::new();
        for handler in &self.handlers {
            if let Err(e) = handler.close() {
                match e {
                    LoggerError::CloseFailed { failures: inner } => failures.extend(inner),
                    other => failures.push(other.to_string()),
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::CloseFailed { failures })
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("handlers", &self.handlers)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.is_closed() {
            return;
        }
        // Sinks that buffer output get a final chance to write it out
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during drop: {}", e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_slog::prelude::*;
///
/// let logger = Logger::builder()
///     .handler(Handler::new(Level::Debug, Formatter::default_format()).with_sink(DiscardSink::new()))
///     .handler(Handler::new(Level::Error, Formatter::compact_format()).with_sink(ConsoleSink::stderr()))
///     .build();
///
/// assert_eq!(logger.min_level(), Some(Level::Debug));
/// ```
pub struct LoggerBuilder {
    handlers: Vec<Handler>,
}

impl LoggerBuilder {
    /// Create a new builder with no handlers
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Add a handler
    #[must_use = "builder methods return a new value"]
    pub fn handler(mut self, handler: Handler) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let mut logger = Logger::new();
        for handler in self.handlers {
            logger.add_handler(handler);
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
