//! Buffered file sink with a background flusher

use super::file::open_append;
use crate::core::handler::panic_message;
use crate::core::{LoggerError, Result, Sink};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default write buffer size (64 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Default interval between background flushes
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

type SharedWriter = Arc<Mutex<Option<BufWriter<File>>>>;

struct Flusher {
    shutdown: Sender<()>,
    handle: thread::JoinHandle<()>,
}

/// Appends records to a file through an in-memory buffer.
///
/// A background thread flushes the buffer every `flush_interval`; `close`
/// stops that thread and writes out whatever is left. Records still in the
/// buffer when the process dies are lost.
///
/// # Examples
///
/// ```no_run
/// use rust_slog::sinks::BufferedFileSink;
/// use std::time::Duration;
///
/// let sink = BufferedFileSink::with_options("/var/log/app.log", 8 * 1024, Some(Duration::from_millis(200)))
///     .unwrap();
/// ```
pub struct BufferedFileSink {
    path: PathBuf,
    writer: SharedWriter,
    flusher: Mutex<Option<Flusher>>,
}

impl BufferedFileSink {
    /// Open `path` with the default buffer size and flush interval
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_options(path, DEFAULT_BUFFER_SIZE, Some(DEFAULT_FLUSH_INTERVAL))
    }

    /// Open `path` with an explicit buffer size.
    ///
    /// Without a `flush_interval` no thread is started and the buffer is
    /// only written when it fills up, on `flush`, or on `close`.
    pub fn with_options(
        path: impl Into<PathBuf>,
        buffer_size: usize,
        flush_interval: Option<Duration>,
    ) -> Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let writer: SharedWriter = Arc::new(Mutex::new(Some(BufWriter::with_capacity(
            buffer_size.max(1),
            file,
        ))));

        let flusher = match flush_interval {
            Some(interval) => Some(Self::spawn_flusher(&path, Arc::clone(&writer), interval)?),
            None => None,
        };

        Ok(Self {
            path,
            writer,
            flusher: Mutex::new(flusher),
        })
    }

    fn spawn_flusher(path: &Path, writer: SharedWriter, interval: Duration) -> Result<Flusher> {
        let (shutdown, shutdown_rx) = bounded::<()>(1);
        let display_path = path.display().to_string();

        let handle = thread::Builder::new()
            .name("slog-flusher".to_string())
            .spawn(move || loop {
                match shutdown_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Some(w) = writer.lock().as_mut() {
                            if let Err(e) = w.flush() {
                                eprintln!(
                                    "[LOGGER ERROR] Periodic flush of '{}' failed: {}",
                                    display_path, e
                                );
                            }
                        }
                    }
                    // Shutdown requested or the sink was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|e| LoggerError::io_operation("spawn flusher thread", path.display().to_string(), e))?;

        Ok(Flusher { shutdown, handle })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn stop_flusher(&self) {
        if let Some(flusher) = self.flusher.lock().take() {
            let _ = flusher.shutdown.send(());
            if let Err(panic_info) = flusher.handle.join() {
                eprintln!(
                    "[LOGGER ERROR] Flusher thread for '{}' panicked: {}",
                    self.path.display(),
                    panic_message(panic_info.as_ref())
                );
            }
        }
    }
}

impl Sink for BufferedFileSink {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        let mut guard = self.writer.lock();
        let writer = guard
            .as_mut()
            .ok_or_else(|| LoggerError::sink_closed(self.name()))?;
        writer.write_all(buf).map_err(|e| {
            LoggerError::file_sink(
                self.path.display().to_string(),
                format!("Failed to write log record: {}", e),
            )
        })?;
        Ok(buf.len())
    }

    fn flush(&self) -> Result<()> {
        if let Some(writer) = self.writer.lock().as_mut() {
            writer.flush().map_err(|e| {
                LoggerError::file_sink(self.path.display().to_string(), format!("Failed to flush: {}", e))
            })?;
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.stop_flusher();

        let Some(writer) = self.writer.lock().take() else {
            return Ok(());
        };
        let file = writer.into_inner().map_err(|e| {
            LoggerError::file_sink(
                self.path.display().to_string(),
                format!("Failed to flush buffered records on close: {}", e.error()),
            )
        })?;
        file.sync_all().map_err(|e| {
            LoggerError::io_operation(
                "close log file",
                format!("Failed to sync '{}'", self.path.display()),
                e,
            )
        })
    }

    fn name(&self) -> &str {
        "buffered_file"
    }
}

impl Drop for BufferedFileSink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!("[LOGGER ERROR] Failed to close buffered sink during drop: {}", e);
        }
    }
}
