//! Core logger types and traits

pub mod config;
pub mod dispatch;
pub mod error;
pub mod format_part;
pub mod formatter;
pub mod handler;
pub mod interpolate;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod sink;
pub mod timestamp;

pub use config::{HandlerConfig, LoggerConfig, SinkConfig};
pub use dispatch::Dispatcher;
pub use error::{LoggerError, Result};
pub use format_part::FormatPart;
pub use formatter::{Formatter, FormatterConfig, COMPACT_FORMAT, DEFAULT_FORMAT};
pub use handler::Handler;
pub use interpolate::{format_message, write_message, MAX_WIDTH};
pub use log_level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::HandlerMetrics;
pub use record::Record;
pub use sink::Sink;
pub use timestamp::TimePrecision;
