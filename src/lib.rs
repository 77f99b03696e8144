//! # rust_slog
//!
//! A small, synchronous, leveled logging library.
//!
//! Log calls flow through three stages:
//!
//! - a [`Logger`] stamps each call into a [`Record`] and hands it to its
//!   handlers in order,
//! - each [`Handler`] drops records below its threshold, renders the rest
//!   with a compiled [`Formatter`], and writes the line to its sinks,
//! - each [`Sink`] receives complete rendered lines.
//!
//! Templates are compiled once. `%l` renders the level letter, `%T` the
//! time of day, `%D` the date, `%m` the message and `%%` a percent sign;
//! anything else is kept as literal text, and every line ends in `\n`.
//!
//! A [`Dispatcher`] (and the process-wide one in [`global`]) resolves each
//! level up front to either a call into the logger or a no-op, so disabled
//! levels never build a record.
//!
//! ## Example
//!
//! ```
//! use rust_slog::prelude::*;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = Logger::builder()
//!     .handler(Handler::new(Level::Info, Formatter::parse("[%l] %m")).with_shared_sink(sink.clone()))
//!     .build();
//!
//! logger.infof("connected to %s in %dms", &[&"db-1", &12]);
//! logger.debug(&[&"not shown"]);
//!
//! assert_eq!(sink.contents(), "[I] connected to db-1 in 12ms\n");
//! ```

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Dispatcher, Formatter, FormatterConfig, Handler, HandlerMetrics, Level, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, Record, Result, Sink, TimePrecision,
    };
    pub use crate::sinks::{
        BufferedFileSink, ConsoleSink, ConsoleStream, DiscardSink, FileSink, MemorySink,
        RotatingFileSink, RotationPolicy, RotationStrategy,
    };
}

pub use crate::core::{
    Dispatcher, FormatPart, Formatter, FormatterConfig, Handler, HandlerConfig, HandlerMetrics,
    Level, Logger, LoggerBuilder, LoggerConfig, LoggerError, Record, Result, Sink, SinkConfig,
    TimePrecision, COMPACT_FORMAT, DEFAULT_FORMAT,
};
pub use crate::sinks::{
    BufferedFileSink, ConsoleSink, ConsoleStream, DiscardSink, FileSink, MemorySink,
    RotatingFileSink, RotationPolicy, RotationStrategy,
};
