//! Sink implementations

pub mod buffered_file;
pub mod console;
pub mod discard;
pub mod file;
pub mod memory;
pub mod rotating_file;

pub use buffered_file::{BufferedFileSink, DEFAULT_BUFFER_SIZE, DEFAULT_FLUSH_INTERVAL};
pub use console::{ConsoleSink, ConsoleStream};
pub use discard::DiscardSink;
pub use file::FileSink;
pub use memory::MemorySink;
pub use rotating_file::{RotatingFileSink, RotationPolicy, RotationStrategy};

pub use crate::core::Sink;
