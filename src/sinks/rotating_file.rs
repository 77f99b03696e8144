//! Rotating file sink
//!
//! Writes to a base file and moves it aside to numbered backups
//! (`app.log.1`, `app.log.2`, ...) when the configured strategy says so.
//! Backups beyond the configured count are deleted, and may be gzipped.

use super::file::open_append;
use crate::core::{LoggerError, Result, Sink};
use chrono::{DateTime, Local, Timelike};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Rotation strategy defining when to rotate log files
///
/// # Examples
///
/// ```
/// use rust_slog::sinks::RotationStrategy;
/// use std::time::Duration;
///
/// // Rotate when file exceeds 100 MB
/// let size_strategy = RotationStrategy::Size { max_bytes: 100 * 1024 * 1024 };
///
/// // Rotate daily at midnight
/// let daily_strategy = RotationStrategy::Daily { hour: 0 };
///
/// // Rotate on size OR time, whichever comes first
/// let hybrid_strategy = RotationStrategy::Hybrid {
///     max_bytes: 50 * 1024 * 1024,
///     interval: Duration::from_secs(24 * 3600),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RotationStrategy {
    /// Rotate when file exceeds size in bytes
    Size { max_bytes: u64 },

    /// Rotate at time interval
    Time { interval: Duration },

    /// Rotate daily at specified hour (0-23)
    Daily { hour: u8 },

    /// Rotate hourly
    Hourly,

    /// Rotate on size OR time, whichever comes first
    Hybrid { max_bytes: u64, interval: Duration },

    /// No rotation (external rotation or tests)
    Never,
}

impl Default for RotationStrategy {
    fn default() -> Self {
        RotationStrategy::Size {
            max_bytes: 10 * 1024 * 1024, // 10 MB
        }
    }
}

/// Configuration for [`RotatingFileSink`]
///
/// # Examples
///
/// ```
/// use rust_slog::sinks::{RotationPolicy, RotationStrategy};
///
/// let policy = RotationPolicy::new()
///     .with_strategy(RotationStrategy::Daily { hour: 2 })
///     .with_max_backups(30)
///     .with_compression(true);
/// assert_eq!(policy.max_backup_files, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPolicy {
    /// Rotation strategy defining when to rotate
    pub strategy: RotationStrategy,
    /// Maximum number of rotated files to keep
    pub max_backup_files: usize,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            strategy: RotationStrategy::default(),
            max_backup_files: 5,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_strategy(mut self, strategy: RotationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Shorthand for `with_strategy(RotationStrategy::Size { max_bytes })`
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, max_bytes: u64) -> Self {
        self.strategy = RotationStrategy::Size { max_bytes };
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backup_files = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self.strategy {
            RotationStrategy::Daily { hour } if hour > 23 => Err(LoggerError::config(
                "RotationPolicy",
                format!("daily rotation hour must be 0-23, got {}", hour),
            )),
            RotationStrategy::Time { interval } | RotationStrategy::Hybrid { interval, .. }
                if interval.is_zero() =>
            {
                Err(LoggerError::config("RotationPolicy", "rotation interval must be non-zero"))
            }
            _ => Ok(()),
        }
    }
}

struct RotatingState {
    writer: Option<BufWriter<File>>,
    current_size: u64,
    last_rotation: SystemTime,
    closed: bool,
}

/// File sink that rotates its file by size and/or time.
///
/// Rotation is checked before every write, so a record is never split
/// across two files. If rotation fails the record is still written to the
/// current file and the failure is reported on stderr.
pub struct RotatingFileSink {
    base_path: PathBuf,
    policy: RotationPolicy,
    state: Mutex<RotatingState>,
}

impl RotatingFileSink {
    /// Open `path` with the default size-based policy
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    pub fn with_policy(path: impl AsRef<Path>, policy: RotationPolicy) -> Result<Self> {
        policy.validate()?;
        let base_path = path.as_ref().to_path_buf();
        let (file, current_size, last_rotation) = Self::open(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            state: Mutex::new(RotatingState {
                writer: Some(BufWriter::new(file)),
                current_size,
                last_rotation,
                closed: false,
            }),
        })
    }

    fn open(path: &Path) -> Result<(File, u64, SystemTime)> {
        let file = open_append(path)?;
        let metadata = file.metadata().map_err(|e| {
            LoggerError::file_sink(
                path.display().to_string(),
                format!("Cannot access file metadata: {}", e),
            )
        })?;
        // An existing file's age counts toward time-based rotation
        let last_rotation = metadata.modified().unwrap_or_else(|_| SystemTime::now());
        Ok((file, metadata.len(), last_rotation))
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Bytes written to the current file
    pub fn current_size(&self) -> u64 {
        self.state.lock().current_size
    }

    pub fn last_rotation(&self) -> SystemTime {
        self.state.lock().last_rotation
    }

    fn should_rotate(&self, state: &RotatingState) -> bool {
        let elapsed = || {
            SystemTime::now()
                .duration_since(state.last_rotation)
                .unwrap_or(Duration::ZERO)
        };

        match &self.policy.strategy {
            RotationStrategy::Never => false,
            RotationStrategy::Size { max_bytes } => state.current_size >= *max_bytes,
            RotationStrategy::Time { interval } => elapsed() >= *interval,
            RotationStrategy::Daily { hour } => {
                let now: DateTime<Local> = SystemTime::now().into();
                let last: DateTime<Local> = state.last_rotation.into();
                now.date_naive() != last.date_naive() && now.hour() >= u32::from(*hour)
            }
            RotationStrategy::Hourly => elapsed() >= Duration::from_secs(3600),
            RotationStrategy::Hybrid {
                max_bytes,
                interval,
            } => state.current_size >= *max_bytes || elapsed() >= *interval,
        }
    }

    fn rotate(&self, state: &mut RotatingState) -> Result<()> {
        if let Some(mut writer) = state.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let max = self.policy.max_backup_files;
        if max == 0 {
            // No backups kept: start the file over
            fs::remove_file(&self.base_path).or_else(ignore_not_found)?;
        } else {
            // The oldest backup falls off the end
            for oldest in [self.backup_path(max), gz_path(&self.backup_path(max))] {
                fs::remove_file(&oldest).or_else(ignore_not_found)?;
            }

            for i in (1..max).rev() {
                let from = self.backup_path(i);
                let to = self.backup_path(i + 1);
                rename_if_exists(&gz_path(&from), &gz_path(&to))?;
                rename_if_exists(&from, &to)?;
            }

            let first = self.backup_path(1);
            if self.base_path.exists() {
                fs::rename(&self.base_path, &first).map_err(|e| {
                    LoggerError::file_rotation(
                        self.base_path.display().to_string(),
                        format!("Failed to rotate current log file: {}", e),
                    )
                })?;
                if self.policy.compress {
                    compress_file(&first)?;
                }
            }
        }

        let (file, size, _) = Self::open(&self.base_path)?;
        state.writer = Some(BufWriter::new(file));
        state.current_size = size;
        state.last_rotation = SystemTime::now();
        Ok(())
    }

    /// Backup path for `index`, e.g. `app.log.3`
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log")
            .to_string();
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

fn ignore_not_found(e: std::io::Error) -> std::io::Result<()> {
    if e.kind() == std::io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(e)
    }
}

fn rename_if_exists(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Ok(());
    }
    fs::rename(from, to).map_err(|e| {
        LoggerError::file_rotation(
            from.display().to_string(),
            format!("Failed to rotate backup file: {}", e),
        )
    })
}

/// Gzip `path` next to itself and remove the original.
///
/// The archive is written to a temporary name first; the original is only
/// removed after the archive is complete.
fn compress_file(path: &Path) -> Result<()> {
    let gz = gz_path(path);
    let mut tmp = gz.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let compress = || -> std::io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&tmp)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        std::io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&tmp, &gz)
    };

    if let Err(e) = compress() {
        let _ = fs::remove_file(&tmp);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress '{}'", path.display()),
            e,
        ));
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compressed '{}' but could not remove the original: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

impl Sink for RotatingFileSink {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(LoggerError::sink_closed(self.name()));
        }

        if self.should_rotate(&state) {
            if let Err(e) = self.rotate(&mut state) {
                eprintln!(
                    "[LOGGER WARNING] Log rotation of '{}' failed: {}. Continuing with current file.",
                    self.base_path.display(),
                    e
                );
                if state.writer.is_none() {
                    let (file, size, last_rotation) = Self::open(&self.base_path)?;
                    state.writer = Some(BufWriter::new(file));
                    state.current_size = size;
                    state.last_rotation = last_rotation;
                }
                // Let the file grow past the limit rather than retry on every write
                state.current_size = 0;
                state.last_rotation = SystemTime::now();
            }
        }

        let writer = state
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;
        writer.write_all(buf).map_err(|e| {
            LoggerError::file_sink(
                self.base_path.display().to_string(),
                format!("Failed to write log record: {}", e),
            )
        })?;
        state.current_size += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&self) -> Result<()> {
        if let Some(writer) = self.state.lock().writer.as_mut() {
            writer.flush().map_err(|e| {
                LoggerError::file_sink(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.closed = true;
        if let Some(mut writer) = state.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.state.get_mut().writer.take() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_rotation_policy_builder() {
        let policy = RotationPolicy::new()
            .with_max_size(1024)
            .with_max_backups(3)
            .with_compression(true);
        assert_eq!(policy.strategy, RotationStrategy::Size { max_bytes: 1024 });
        assert_eq!(policy.max_backup_files, 3);
        assert!(policy.compress);
    }

    #[test]
    fn test_policy_validation() {
        let bad_hour = RotationPolicy::new().with_strategy(RotationStrategy::Daily { hour: 24 });
        assert!(bad_hour.validate().is_err());

        let zero = RotationPolicy::new().with_strategy(RotationStrategy::Time {
            interval: Duration::ZERO,
        });
        assert!(zero.validate().is_err());

        assert!(RotationPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_size_based_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let policy = RotationPolicy::new().with_max_size(10).with_max_backups(2);
        let sink = RotatingFileSink::with_policy(&path, policy).unwrap();

        sink.write(b"first-line\n").unwrap(); // 11 bytes, over the limit
        sink.write(b"second\n").unwrap(); // rotates before writing
        sink.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("app.log.1")).unwrap(),
            "first-line\n"
        );
    }

    #[test]
    fn test_backups_are_bounded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let policy = RotationPolicy::new().with_max_size(1).with_max_backups(2);
        let sink = RotatingFileSink::with_policy(&path, policy).unwrap();

        for i in 0..5 {
            sink.write(format!("{}\n", i).as_bytes()).unwrap();
        }
        sink.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "4\n");
        assert_eq!(fs::read_to_string(dir.path().join("app.log.1")).unwrap(), "3\n");
        assert_eq!(fs::read_to_string(dir.path().join("app.log.2")).unwrap(), "2\n");
        assert!(!dir.path().join("app.log.3").exists());
    }

    #[test]
    fn test_time_based_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("timed.log");
        let policy = RotationPolicy::new().with_strategy(RotationStrategy::Time {
            interval: Duration::from_millis(50),
        });
        let sink = RotatingFileSink::with_policy(&path, policy).unwrap();
        let before = sink.last_rotation();

        sink.write(b"old\n").unwrap();
        std::thread::sleep(Duration::from_millis(120));
        sink.write(b"new\n").unwrap();
        sink.flush().unwrap();

        assert!(sink.last_rotation() > before);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        assert_eq!(fs::read_to_string(dir.path().join("timed.log.1")).unwrap(), "old\n");
    }

    #[test]
    fn test_never_rotates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("never.log");
        let policy = RotationPolicy::new().with_strategy(RotationStrategy::Never);
        let sink = RotatingFileSink::with_policy(&path, policy).unwrap();

        for _ in 0..100 {
            sink.write(b"0123456789\n").unwrap();
        }
        sink.flush().unwrap();

        assert_eq!(sink.current_size(), 1100);
        assert!(!dir.path().join("never.log.1").exists());
    }

    #[test]
    fn test_compressed_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zip.log");
        let policy = RotationPolicy::new()
            .with_max_size(4)
            .with_max_backups(1)
            .with_compression(true);
        let sink = RotatingFileSink::with_policy(&path, policy).unwrap();

        sink.write(b"packed\n").unwrap();
        sink.write(b"plain\n").unwrap();
        sink.close().unwrap();

        let archive = dir.path().join("zip.log.1.gz");
        assert!(archive.exists());
        assert!(!dir.path().join("zip.log.1").exists());

        let mut decoded = String::new();
        GzDecoder::new(File::open(archive).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "packed\n");
    }

    #[test]
    fn test_write_after_close_fails() {
        let dir = tempdir().unwrap();
        let sink = RotatingFileSink::new(dir.path().join("closed.log")).unwrap();
        sink.close().unwrap();
        assert!(matches!(sink.write(b"x\n"), Err(LoggerError::SinkClosed(_))));
    }

    #[test]
    fn test_strategy_serde() {
        let json = r#"{"strategy":{"kind":"hybrid","max_bytes":100,"interval":{"secs":60,"nanos":0}},"max_backup_files":2}"#;
        let policy: RotationPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(
            policy.strategy,
            RotationStrategy::Hybrid {
                max_bytes: 100,
                interval: Duration::from_secs(60)
            }
        );
        assert!(!policy.compress);
    }
}
