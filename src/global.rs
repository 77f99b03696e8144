//! Process-wide default logger.
//!
//! The module keeps one [`Dispatcher`] in an atomically swappable slot.
//! Installing a logger builds a fresh dispatcher with every level already
//! resolved and swaps it in whole, so a call that races with
//! [`set_default_logger`] sees either the old binding or the new one.
//!
//! Until a logger is installed every function here is a no-op.
//!
//! # Example
//!
//! ```
//! use rust_slog::prelude::*;
//! use rust_slog::global;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = Logger::builder()
//!     .handler(Handler::new(Level::Info, Formatter::parse("%l %m")).with_shared_sink(sink.clone()))
//!     .build();
//!
//! global::set_default_logger(Arc::new(logger));
//! global::infof("started %v workers", &[&4]);
//! global::debug(&[&"not enabled"]);
//!
//! assert_eq!(sink.contents(), "I started 4 workers\n");
//! # global::reset_default_logger();
//! ```

use crate::core::{Dispatcher, Level, Logger};
use arc_swap::ArcSwap;
use std::fmt::Display;
use std::sync::{Arc, LazyLock};

static DISPATCHER: LazyLock<ArcSwap<Dispatcher>> =
    LazyLock::new(|| ArcSwap::from_pointee(Dispatcher::new()));

/// Install `logger` as the process-wide default and rebind every level.
///
/// Returns the previously installed logger. It is not closed; callers that
/// own it decide when to flush and close it.
pub fn set_default_logger(logger: Arc<Logger>) -> Option<Arc<Logger>> {
    let previous = DISPATCHER.swap(Arc::new(Dispatcher::with_logger(logger)));
    previous.logger().cloned()
}

/// Remove the default logger; every level becomes a no-op again
pub fn reset_default_logger() -> Option<Arc<Logger>> {
    let previous = DISPATCHER.swap(Arc::new(Dispatcher::new()));
    previous.logger().cloned()
}

pub fn default_logger() -> Option<Arc<Logger>> {
    DISPATCHER.load().logger().cloned()
}

/// Snapshot of the current dispatcher.
///
/// Hot loops can hold on to it to skip the slot lookup; it keeps pointing at
/// the logger that was installed when it was taken.
pub fn dispatcher() -> Arc<Dispatcher> {
    DISPATCHER.load_full()
}

pub fn is_enabled(level: Level) -> bool {
    DISPATCHER.load().is_enabled(level)
}

#[inline]
pub fn log(level: Level, message: &str, args: &[&dyn Display]) {
    DISPATCHER.load().log(level, message, args);
}

#[inline]
pub fn debug(args: &[&dyn Display]) {
    log(Level::Debug, "", args);
}

#[inline]
pub fn debugf(message: &str, args: &[&dyn Display]) {
    log(Level::Debug, message, args);
}

#[inline]
pub fn info(args: &[&dyn Display]) {
    log(Level::Info, "", args);
}

#[inline]
pub fn infof(message: &str, args: &[&dyn Display]) {
    log(Level::Info, message, args);
}

#[inline]
pub fn warn(args: &[&dyn Display]) {
    log(Level::Warn, "", args);
}

#[inline]
pub fn warnf(message: &str, args: &[&dyn Display]) {
    log(Level::Warn, message, args);
}

#[inline]
pub fn error(args: &[&dyn Display]) {
    log(Level::Error, "", args);
}

#[inline]
pub fn errorf(message: &str, args: &[&dyn Display]) {
    log(Level::Error, message, args);
}

#[inline]
pub fn crit(args: &[&dyn Display]) {
    log(Level::Crit, "", args);
}

#[inline]
pub fn critf(message: &str, args: &[&dyn Display]) {
    log(Level::Crit, message, args);
}
