//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// A sink accepted fewer bytes than one rendered record
    #[error("Short write to sink '{sink}': {written}/{expected} bytes")]
    ShortWrite {
        sink: String,
        written: usize,
        expected: usize,
    },

    /// Write or flush attempted after the sink was closed
    #[error("Sink '{0}' is closed")]
    SinkClosed(String),

    /// A sink panicked while writing or closing
    #[error("Sink '{sink}' panicked: {message}")]
    SinkPanicked { sink: String, message: String },

    /// One or more sinks failed to close; every sink was still attempted
    #[error("{} sink(s) failed to close: {}", .failures.len(), .failures.join("; "))]
    CloseFailed { failures: Vec<String> },

    /// One or more sinks failed to flush; every sink was still attempted
    #[error("{} sink(s) failed to flush: {}", .failures.len(), .failures.join("; "))]
    FlushFailed { failures: Vec<String> },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn short_write(sink: impl Into<String>, written: usize, expected: usize) -> Self {
        LoggerError::ShortWrite {
            sink: sink.into(),
            written,
            expected,
        }
    }

    pub fn sink_closed(sink: impl Into<String>) -> Self {
        LoggerError::SinkClosed(sink.into())
    }

    pub fn sink_panicked(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkPanicked {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Aggregate individual close failures into one error
    pub fn close_failed(failures: Vec<LoggerError>) -> Self {
        LoggerError::CloseFailed {
            failures: failures.iter().map(ToString::to_string).collect(),
        }
    }

    /// Aggregate individual flush failures into one error
    pub fn flush_failed(failures: Vec<LoggerError>) -> Self {
        LoggerError::FlushFailed {
            failures: failures.iter().map(ToString::to_string).collect(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("LoggerConfig", "unknown sink 'app'");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::file_sink("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::FileSinkError { .. }));

        let err = LoggerError::sink_closed("memory");
        assert!(matches!(err, LoggerError::SinkClosed(_)));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::short_write("file", 3, 10);
        assert_eq!(err.to_string(), "Short write to sink 'file': 3/10 bytes");

        let err = LoggerError::file_rotation("/var/log/app.log", "Disk full");
        assert_eq!(
            err.to_string(),
            "File rotation failed for '/var/log/app.log': Disk full"
        );

        let err = LoggerError::sink_panicked("console", "boom");
        assert_eq!(err.to_string(), "Sink 'console' panicked: boom");
    }

    #[test]
    fn test_close_failed_aggregates_messages() {
        let err = LoggerError::close_failed(vec![
            LoggerError::sink_closed("a"),
            LoggerError::writer("disk gone"),
        ]);
        match &err {
            LoggerError::CloseFailed { failures } => assert_eq!(failures.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "2 sink(s) failed to close: Sink 'a' is closed; Writer error: disk gone"
        );
    }

    #[test]
    fn test_flush_failed_display() {
        let err = LoggerError::flush_failed(vec![LoggerError::writer("disk gone")]);
        assert!(matches!(err, LoggerError::FlushFailed { ref failures } if failures.len() == 1));
        assert_eq!(err.to_string(), "1 sink(s) failed to flush: Writer error: disk gone");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("writing log file", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing log file"));
        assert!(err.to_string().contains("cannot write to file"));
    }
}
