//! In-memory sink

use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Collects rendered lines in memory.
///
/// Useful in tests and for capturing output that is inspected by the
/// application itself.
#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: Mutex<Vec<u8>>,
    writes: AtomicUsize,
    closed: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    /// Written lines without their terminators
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    /// Number of successful `write` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
        self.writes.store(0, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Sink for MemorySink {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        if self.is_closed() {
            return Err(LoggerError::sink_closed(self.name()));
        }
        self.buffer.lock().extend_from_slice(buf);
        self.writes.fetch_add(1, Ordering::AcqRel);
        Ok(buf.len())
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_writes() {
        let sink = MemorySink::new();
        assert_eq!(sink.write(b"a\n").unwrap(), 2);
        sink.write(b"bc\n").unwrap();
        assert_eq!(sink.contents(), "a\nbc\n");
        assert_eq!(sink.lines(), vec!["a", "bc"]);
        assert_eq!(sink.write_count(), 2);

        sink.clear();
        assert!(sink.bytes().is_empty());
        assert_eq!(sink.write_count(), 0);
    }

    #[test]
    fn test_write_after_close_fails() {
        let sink = MemorySink::new();
        sink.close().unwrap();
        assert!(matches!(sink.write(b"x"), Err(LoggerError::SinkClosed(_))));
    }
}
