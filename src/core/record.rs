//! Log record structure

use super::log_level::Level;
use chrono::{DateTime, Local};
use std::fmt;

/// Immutable snapshot of one logging call.
///
/// A record borrows its message template and arguments from the call site:
/// it is built, rendered by every admitting handler and dropped before the
/// logging call returns, so nothing is copied up front.
#[derive(Clone, Copy)]
pub struct Record<'a> {
    level: Level,
    timestamp: DateTime<Local>,
    message: &'a str,
    args: &'a [&'a dyn fmt::Display],
}

impl<'a> Record<'a> {
    /// Create a record stamped with the current local time
    pub fn new(level: Level, message: &'a str, args: &'a [&'a dyn fmt::Display]) -> Self {
        Self::with_timestamp(level, Local::now(), message, args)
    }

    pub fn with_timestamp(
        level: Level,
        timestamp: DateTime<Local>,
        message: &'a str,
        args: &'a [&'a dyn fmt::Display],
    ) -> Self {
        Self {
            level,
            timestamp,
            message,
            args,
        }
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    /// The message template, possibly empty
    #[inline]
    pub fn message(&self) -> &'a str {
        self.message
    }

    #[inline]
    pub fn args(&self) -> &'a [&'a dyn fmt::Display] {
        self.args
    }
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(ToString::to_string).collect();
        f.debug_struct("Record")
            .field("level", &self.level)
            .field("timestamp", &self.timestamp)
            .field("message", &self.message)
            .field("args", &args)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let args: [&dyn fmt::Display; 2] = [&1, &"two"];
        let record = Record::new(Level::Warn, "a %v %v", &args);
        assert_eq!(record.level(), Level::Warn);
        assert_eq!(record.message(), "a %v %v");
        assert_eq!(record.args().len(), 2);
        assert_eq!(record.args()[1].to_string(), "two");
    }

    #[test]
    fn test_debug_lists_rendered_args() {
        let args: [&dyn fmt::Display; 1] = [&42];
        let record = Record::new(Level::Info, "", &args);
        let debug = format!("{:?}", record);
        assert!(debug.contains("Info"));
        assert!(debug.contains("\"42\""));
    }
}
