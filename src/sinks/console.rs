//! Console sink implementation

use crate::core::{LoggerError, Result, Sink};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

/// Which standard stream a [`ConsoleSink`] writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

/// Writes rendered lines to stdout or stderr.
///
/// Each record is written while holding the stream lock, so lines from
/// different threads never interleave.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    stream: ConsoleStream,
    closed: AtomicBool,
}

impl ConsoleSink {
    pub fn new(stream: ConsoleStream) -> Self {
        Self {
            stream,
            closed: AtomicBool::new(false),
        }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl Sink for ConsoleSink {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        if self.closed.load(Ordering::Acquire) {
            return Err(LoggerError::sink_closed(self.name()));
        }
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().lock().write_all(buf)?,
            ConsoleStream::Stderr => std::io::stderr().lock().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().flush()?,
            ConsoleStream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        // The process keeps its standard streams; closing only flushes
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.flush()
    }

    fn name(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_sink_writes() {
        let sink = ConsoleSink::stdout();
        assert_eq!(sink.write(b"console sink test line\n").unwrap(), 23);
        sink.flush().unwrap();
    }

    #[test]
    fn test_names() {
        assert_eq!(ConsoleSink::stdout().name(), "stdout");
        assert_eq!(ConsoleSink::stderr().name(), "stderr");
        assert_eq!(ConsoleSink::default().stream(), ConsoleStream::Stdout);
    }

    #[test]
    fn test_closed_console_rejects_writes() {
        let sink = ConsoleSink::stderr();
        sink.close().unwrap();
        sink.close().unwrap();
        assert!(sink.write(b"late\n").is_err());
    }
}
