//! Declarative logger configuration
//!
//! A [`LoggerConfig`] names its sinks once and lets any number of handlers
//! refer to them. Each named sink is opened exactly once and shared by all
//! handlers that list it.
//!
//! ```json
//! {
//!   "sinks": {
//!     "console": { "type": "console", "stream": "stderr" },
//!     "app":     { "type": "file", "path": "/var/log/app.log" }
//!   },
//!   "handlers": [
//!     { "level": "debug", "sinks": ["app"] },
//!     { "level": "error", "format": "[%l %T] %m", "sinks": ["console", "app"] }
//!   ]
//! }
//! ```

use super::{
    error::{LoggerError, Result},
    formatter::{Formatter, FormatterConfig, DEFAULT_FORMAT},
    handler::Handler,
    log_level::Level,
    logger::Logger,
    sink::Sink,
    timestamp::TimePrecision,
};
use crate::sinks::{
    BufferedFileSink, ConsoleSink, ConsoleStream, DiscardSink, FileSink, RotatingFileSink,
    RotationPolicy, DEFAULT_BUFFER_SIZE,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_flush_interval_ms() -> Option<u64> {
    Some(1000)
}

/// One sink definition, selected by its `type` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    Console {
        #[serde(default)]
        stream: ConsoleStream,
    },
    File {
        path: PathBuf,
    },
    BufferedFile {
        path: PathBuf,
        #[serde(default = "default_buffer_size")]
        buffer_size: usize,
        /// `null` disables the background flusher
        #[serde(default = "default_flush_interval_ms")]
        flush_interval_ms: Option<u64>,
    },
    RotatingFile {
        path: PathBuf,
        #[serde(default)]
        policy: RotationPolicy,
    },
    Discard,
}

impl SinkConfig {
    /// Open the sink described by this entry
    pub fn open(&self) -> Result<Arc<dyn Sink>> {
        let sink: Arc<dyn Sink> = match self {
            SinkConfig::Console { stream } => Arc::new(ConsoleSink::new(*stream)),
            SinkConfig::File { path } => Arc::new(FileSink::new(path)?),
            SinkConfig::BufferedFile {
                path,
                buffer_size,
                flush_interval_ms,
            } => Arc::new(BufferedFileSink::with_options(
                path,
                *buffer_size,
                flush_interval_ms.map(Duration::from_millis),
            )?),
            SinkConfig::RotatingFile { path, policy } => {
                Arc::new(RotatingFileSink::with_policy(path, policy.clone())?)
            }
            SinkConfig::Discard => Arc::new(DiscardSink::new()),
        };
        Ok(sink)
    }
}

/// One handler: a threshold, a template and the names of its sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    #[serde(default)]
    pub level: Level,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub time_precision: TimePrecision,
    pub sinks: Vec<String>,
}

impl HandlerConfig {
    pub fn new(level: Level, sinks: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            level,
            format: default_format(),
            time_precision: TimePrecision::default(),
            sinks: sinks.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_time_precision(mut self, precision: TimePrecision) -> Self {
        self.time_precision = precision;
        self
    }
}

/// Complete description of a [`Logger`]
///
/// # Example
///
/// ```
/// use rust_slog::core::config::LoggerConfig;
/// use rust_slog::Level;
///
/// let config = LoggerConfig::from_json_str(r#"{
///     "sinks": { "null": { "type": "discard" } },
///     "handlers": [ { "level": "warn", "sinks": ["null"] } ]
/// }"#).unwrap();
///
/// let logger = config.build().unwrap();
/// assert_eq!(logger.min_level(), Some(Level::Warn));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(default)]
    pub sinks: BTreeMap<String, SinkConfig>,
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

impl LoggerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("Cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&content)
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_sink(mut self, name: impl Into<String>, sink: SinkConfig) -> Self {
        self.sinks.insert(name.into(), sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_handler(mut self, handler: HandlerConfig) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Check sink references without opening anything
    pub fn validate(&self) -> Result<()> {
        for (idx, handler) in self.handlers.iter().enumerate() {
            if handler.sinks.is_empty() {
                return Err(LoggerError::config(
                    format!("handlers[{}]", idx),
                    "handler has no sinks",
                ));
            }
            if let Some(unknown) = handler.sinks.iter().find(|name| !self.sinks.contains_key(*name)) {
                return Err(LoggerError::config(
                    format!("handlers[{}]", idx),
                    format!("unknown sink '{}'", unknown),
                ));
            }
        }
        for (name, sink) in &self.sinks {
            if let SinkConfig::RotatingFile { policy, .. } = sink {
                policy
                    .validate()
                    .map_err(|e| LoggerError::config(format!("sinks.{}", name), e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Validate, open every referenced sink once and assemble the logger.
    ///
    /// Sinks that no handler references are not opened.
    pub fn build(&self) -> Result<Logger> {
        self.validate()?;

        let mut opened: HashMap<&str, Arc<dyn Sink>> = HashMap::new();
        let mut builder = Logger::builder();

        for handler_config in &self.handlers {
            let formatter = Formatter::parse_with(
                &handler_config.format,
                FormatterConfig::new().with_time_precision(handler_config.time_precision),
            );
            let mut handler = Handler::new(handler_config.level, formatter);

            for name in &handler_config.sinks {
                let sink = match opened.get(name.as_str()) {
                    Some(sink) => Arc::clone(sink),
                    None => {
                        let (key, sink_config) = self
                            .sinks
                            .get_key_value(name)
                            .ok_or_else(|| LoggerError::config("LoggerConfig", format!("unknown sink '{}'", name)))?;
                        let sink = sink_config.open()?;
                        opened.insert(key.as_str(), Arc::clone(&sink));
                        sink
                    }
                };
                handler.add_sink(sink);
            }

            builder = builder.handler(handler);
        }

        Ok(builder.build())
    }
}
