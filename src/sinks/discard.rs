//! Sink that drops everything

use crate::core::{LoggerError, Result, Sink};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Accepts every write and throws the bytes away.
///
/// Handy for benchmarks and for silencing a handler without removing it.
#[derive(Debug, Default)]
pub struct DiscardSink {
    discarded: AtomicU64,
    closed: AtomicBool,
}

impl DiscardSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes accepted
    pub fn discarded_bytes(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }
}

impl Sink for DiscardSink {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        if self.closed.load(Ordering::Acquire) {
            return Err(LoggerError::sink_closed(self.name()));
        }
        self.discarded.fetch_add(buf.len() as u64, Ordering::Relaxed);
        Ok(buf.len())
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn name(&self) -> &str {
        "discard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_discarded_bytes() {
        let sink = DiscardSink::new();
        assert_eq!(sink.write(b"hello").unwrap(), 5);
        assert_eq!(sink.write(b"!").unwrap(), 1);
        sink.close().unwrap();
        assert_eq!(sink.discarded_bytes(), 6);
        assert!(matches!(sink.write(b"late"), Err(LoggerError::SinkClosed(_))));
    }
}
