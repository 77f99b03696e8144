//! Level-resolved dispatch to a logger
//!
//! A [`Dispatcher`] decides once, at activation time, which levels can
//! reach its logger. Every level gets a plain function pointer: either one
//! that forwards to [`Logger::log`], or one that returns immediately. Calls
//! at a disabled level therefore cost one indirect call and never build a
//! record or touch a handler.
//!
//! Activation takes `&mut self`, so it cannot overlap with logging through
//! the same dispatcher. The process-wide slot in [`crate::global`] swaps
//! whole dispatchers instead of mutating one in place.

use super::{log_level::Level, logger::Logger};
use std::fmt::Display;
use std::sync::Arc;

type Entry = fn(&Logger, Level, &str, &[&dyn Display]);

fn forward(logger: &Logger, level: Level, message: &str, args: &[&dyn Display]) {
    logger.log(level, message, args);
}

fn discard(_logger: &Logger, _level: Level, _message: &str, _args: &[&dyn Display]) {}

/// Per-level entry points bound to an active [`Logger`].
///
/// # Example
///
/// ```
/// use rust_slog::prelude::*;
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let logger = Arc::new(
///     Logger::builder()
///         .handler(Handler::new(Level::Error, Formatter::parse("%l %m")).with_shared_sink(sink.clone()))
///         .build(),
/// );
///
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.activate(logger);
///
/// dispatcher.warnf("never rendered %v", &[&1]);
/// dispatcher.errorf("rendered %v", &[&2]);
///
/// assert!(!dispatcher.is_enabled(Level::Warn));
/// assert_eq!(sink.contents(), "E rendered 2\n");
/// ```
pub struct Dispatcher {
    logger: Arc<Logger>,
    active: bool,
    entries: [Entry; Level::COUNT],
    enabled: [bool; Level::COUNT],
}

impl Dispatcher {
    /// A dispatcher with no active logger; every level is a no-op
    #[must_use]
    pub fn new() -> Self {
        Self {
            logger: Arc::new(Logger::new()),
            active: false,
            entries: [discard as Entry; Level::COUNT],
            enabled: [false; Level::COUNT],
        }
    }

    /// A dispatcher already activated with `logger`
    #[must_use]
    pub fn with_logger(logger: Arc<Logger>) -> Self {
        let mut dispatcher = Self::new();
        dispatcher.activate(logger);
        dispatcher
    }

    /// Make `logger` the active logger and rebind every level.
    ///
    /// A level is bound to the logger when it is at or above the logger's
    /// lowest handler threshold, otherwise to a no-op. A logger without
    /// handlers leaves every level unbound. Returns the previously active
    /// logger, which is not closed.
    pub fn activate(&mut self, logger: Arc<Logger>) -> Option<Arc<Logger>> {
        let min_level = logger.min_level();
        for level in Level::ALL {
            let reachable = min_level.is_some_and(|min| level >= min);
            self.entries[level.index()] = if reachable { forward as Entry } else { discard };
            self.enabled[level.index()] = reachable;
        }

        let previous = std::mem::replace(&mut self.logger, logger);
        let was_active = std::mem::replace(&mut self.active, true);
        was_active.then_some(previous)
    }

    /// Drop the active logger and unbind every level
    pub fn deactivate(&mut self) -> Option<Arc<Logger>> {
        self.entries = [discard as Entry; Level::COUNT];
        self.enabled = [false; Level::COUNT];
        let previous = std::mem::replace(&mut self.logger, Arc::new(Logger::new()));
        std::mem::replace(&mut self.active, false).then_some(previous)
    }

    pub fn logger(&self) -> Option<&Arc<Logger>> {
        self.active.then_some(&self.logger)
    }

    /// True when calls at `level` reach the active logger
    pub fn is_enabled(&self, level: Level) -> bool {
        self.enabled[level.index()]
    }

    #[inline]
    pub fn log(&self, level: Level, message: &str, args: &[&dyn Display]) {
        (self.entries[level.index()])(&self.logger, level, message, args);
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
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let enabled: Vec<Level> = Level::ALL
            .into_iter()
            .filter(|level| self.is_enabled(*level))
            .collect();
        f.debug_struct("Dispatcher")
            .field("active", &self.active)
            .field("enabled", &enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{formatter::Formatter, handler::Handler};
    use crate::sinks::MemorySink;

    fn logger_with(levels: &[Level], sink: &Arc<MemorySink>) -> Arc<Logger> {
        let mut logger = Logger::new();
        for level in levels {
            logger.add_handler(
                Handler::new(*level, Formatter::parse("%l %m")).with_shared_sink(sink.clone()),
            );
        }
        Arc::new(logger)
    }

    #[test]
    fn test_inactive_dispatcher_is_noop() {
        let dispatcher = Dispatcher::new();
        assert!(dispatcher.logger().is_none());
        for level in Level::ALL {
            assert!(!dispatcher.is_enabled(level));
        }
        dispatcher.critf("nothing %v", &[&1]);
    }

    #[test]
    fn test_binding_follows_min_level() {
        let sink = Arc::new(MemorySink::new());
        let dispatcher = Dispatcher::with_logger(logger_with(&[Level::Error], &sink));

        assert!(!dispatcher.is_enabled(Level::Debug));
        assert!(!dispatcher.is_enabled(Level::Info));
        assert!(!dispatcher.is_enabled(Level::Warn));
        assert!(dispatcher.is_enabled(Level::Error));
        assert!(dispatcher.is_enabled(Level::Crit));

        dispatcher.debug(&[&"d"]);
        dispatcher.infof("i %v", &[&1]);
        dispatcher.warn(&[&"w"]);
        assert_eq!(sink.write_count(), 0);

        dispatcher.error(&[&"e"]);
        dispatcher.critf("c %v", &[&2]);
        assert_eq!(sink.write_count(), 2);
        assert_eq!(sink.contents(), "E e\nC c 2\n");
    }

    #[test]
    fn test_disabled_level_never_reaches_handlers() {
        let sink = Arc::new(MemorySink::new());
        let logger = logger_with(&[Level::Warn], &sink);
        let dispatcher = Dispatcher::with_logger(logger.clone());

        dispatcher.info(&[&"skipped"]);
        // The handler never saw the record, not even to filter it
        assert_eq!(logger.handlers()[0].metrics().filtered(), 0);

        logger.info(&[&"direct"]);
        assert_eq!(logger.handlers()[0].metrics().filtered(), 1);
    }

    #[test]
    fn test_reactivation_rebinds_everything() {
        let sink = Arc::new(MemorySink::new());
        let quiet = logger_with(&[Level::Crit], &sink);
        let verbose = logger_with(&[Level::Debug, Level::Error], &sink);

        let mut dispatcher = Dispatcher::new();
        assert!(dispatcher.activate(quiet.clone()).is_none());
        assert!(!dispatcher.is_enabled(Level::Debug));

        let previous = dispatcher.activate(verbose.clone()).expect("previous logger");
        assert!(Arc::ptr_eq(&previous, &quiet));
        assert!(!previous.is_closed());
        for level in Level::ALL {
            assert!(dispatcher.is_enabled(level));
        }

        dispatcher.activate(quiet);
        assert!(!dispatcher.is_enabled(Level::Error));
        assert!(dispatcher.is_enabled(Level::Crit));
    }

    #[test]
    fn test_logger_without_handlers_binds_nothing() {
        let dispatcher = Dispatcher::with_logger(Arc::new(Logger::new()));
        assert!(dispatcher.logger().is_some());
        for level in Level::ALL {
            assert!(!dispatcher.is_enabled(level));
        }
    }

    #[test]
    fn test_deactivate() {
        let sink = Arc::new(MemorySink::new());
        let mut dispatcher = Dispatcher::with_logger(logger_with(&[Level::Debug], &sink));
        assert!(dispatcher.deactivate().is_some());
        assert!(dispatcher.deactivate().is_none());
        dispatcher.crit(&[&"gone"]);
        assert_eq!(sink.write_count(), 0);
    }
}
