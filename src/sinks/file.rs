//! File sink implementation

use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends every record to a file with one unbuffered write.
///
/// Nothing is held back in memory, so a crash loses at most the record
/// being written. Use [`BufferedFileSink`](super::BufferedFileSink) when
/// throughput matters more.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileSink {
    /// Open `path` for appending, creating it and its parent directory
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Open a log file in append mode, creating missing parent directories
pub(crate) fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", parent.display()),
                e,
            )
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e)))
}

impl Sink for FileSink {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        let mut guard = self.file.lock();
        let file = guard
            .as_mut()
            .ok_or_else(|| LoggerError::sink_closed(self.name()))?;
        file.write_all(buf).map_err(|e| {
            LoggerError::file_sink(
                self.path.display().to_string(),
                format!("Failed to write log record: {}", e),
            )
        })?;
        Ok(buf.len())
    }

    fn flush(&self) -> Result<()> {
        if let Some(file) = self.file.lock().as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        if let Some(file) = self.file.lock().take() {
            file.sync_all().map_err(|e| {
                LoggerError::io_operation(
                    "close log file",
                    format!("Failed to sync '{}'", self.path.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}
