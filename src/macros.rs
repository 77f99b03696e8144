//! Call-site macros.
//!
//! The macros take a target (a [`Logger`](crate::Logger), a
//! [`Dispatcher`](crate::Dispatcher), or anything else with a matching `log`
//! method), a printf-style template and any number of `Display` arguments.
//! They only save writing the `&[&a, &b]` argument slice by hand.
//!
//! # Examples
//!
//! ```
//! use rust_slog::prelude::*;
//! use rust_slog::info;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = Logger::builder()
//!     .handler(Handler::new(Level::Info, Formatter::parse("%l %m")).with_shared_sink(sink.clone()))
//!     .build();
//!
//! let port = 8080;
//! info!(logger, "listening on port %v", port);
//! info!(logger, "%s performed %s", "user-42", "login");
//!
//! assert_eq!(sink.contents(), "I listening on port 8080\nI user-42 performed login\n");
//! ```

/// Log a templated message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_slog::prelude::*;
/// # let logger = Logger::new();
/// use rust_slog::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: %d", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($target:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $target.log(
            $level,
            $template,
            &[$(&$arg as &dyn ::std::fmt::Display),*],
        )
    };
}

/// Log a debug-level message.
///
/// ```
/// # use rust_slog::prelude::*;
/// # let logger = Logger::new();
/// use rust_slog::debug;
/// debug!(logger, "Counter value: %d", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use rust_slog::prelude::*;
/// # let logger = Logger::new();
/// use rust_slog::error;
/// error!(logger, "Error code: %d, message: %s", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::Level::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! crit {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::Level::Crit, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Dispatcher, Formatter, Handler, Level, Logger};
    use crate::sinks::MemorySink;
    use std::sync::Arc;

    fn memory_logger(level: Level) -> (Logger, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::builder()
            .handler(Handler::new(level, Formatter::parse("%l %m")).with_shared_sink(sink.clone()))
            .build();
        (logger, sink)
    }

    #[test]
    fn test_log_macro() {
        let (logger, sink) = memory_logger(Level::Debug);
        log!(logger, Level::Info, "Test message");
        log!(logger, Level::Warn, "Formatted: %d", 42);
        log!(logger, Level::Error, "trailing %v %v,", 1, 2,);
        assert_eq!(sink.lines(), vec!["I Test message", "W Formatted: 42", "E trailing 1 2,"]);
    }

    #[test]
    fn test_level_macros() {
        let (logger, sink) = memory_logger(Level::Debug);
        debug!(logger, "d %v", 1);
        info!(logger, "i");
        warn!(logger, "w %s", "x");
        error!(logger, "e %d/%d", 1, 3);
        crit!(logger, "c");
        assert_eq!(sink.contents(), "D d 1\nI i\nW w x\nE e 1/3\nC c\n");
    }

    #[test]
    fn test_macros_respect_threshold() {
        let (logger, sink) = memory_logger(Level::Error);
        debug!(logger, "hidden");
        info!(logger, "hidden %v", 1);
        error!(logger, "shown");
        assert_eq!(sink.write_count(), 1);
    }

    #[test]
    fn test_macros_on_dispatcher() {
        let (logger, sink) = memory_logger(Level::Warn);
        let dispatcher = Dispatcher::with_logger(Arc::new(logger));
        info!(dispatcher, "skipped");
        warn!(dispatcher, "kept %v", "value");
        assert_eq!(sink.contents(), "W kept value\n");
    }

    #[test]
    fn test_arguments_are_borrowed() {
        let (logger, sink) = memory_logger(Level::Debug);
        let owned = String::from("still usable");
        info!(logger, "%s", owned);
        assert_eq!(owned.len(), 12);
        assert_eq!(sink.contents(), "I still usable\n");
    }
}
