//! Sink trait for rendered log output destinations

use super::error::Result;

/// A destination for rendered log lines.
///
/// Handlers call [`write`](Sink::write) once per rendered record with the
/// complete line. Implementations shared between threads or handlers must
/// keep each call atomic so lines from concurrent writers never interleave.
pub trait Sink: Send + Sync {
    /// Write one rendered record, returning the number of bytes accepted
    fn write(&self, buf: &[u8]) -> Result<usize>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Release the destination; later writes fail with `SinkClosed`
    fn close(&self) -> Result<()>;

    fn name(&self) -> &str;
}
