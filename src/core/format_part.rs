//! Render operations produced by the template compiler

use super::interpolate::write_message;
use super::record::Record;
use super::timestamp::{write_date, write_time, TimePrecision};

/// One compiled render operation.
///
/// The set of operations is closed: the compiler in
/// [`Formatter`](super::formatter::Formatter) only ever produces these
/// variants, and never two literal variants next to each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatPart {
    /// A single literal byte
    Byte(u8),
    /// A run of literal bytes
    Bytes(Box<[u8]>),
    /// The record's one-character level name (`%l`)
    Level,
    /// The record's time of day (`%T`)
    Time(TimePrecision),
    /// The record's date (`%D`)
    Date,
    /// The interpolated message (`%m`)
    Message,
}

impl FormatPart {
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, FormatPart::Byte(_) | FormatPart::Bytes(_))
    }

    /// Append this part's rendering of `record` to `buf`
    #[inline]
    pub fn render(&self, record: &Record<'_>, buf: &mut Vec<u8>) {
        match self {
            FormatPart::Byte(b) => buf.push(*b),
            FormatPart::Bytes(bytes) => buf.extend_from_slice(bytes),
            FormatPart::Level => buf.push(record.level().short_name()),
            FormatPart::Time(precision) => write_time(buf, record.timestamp(), *precision),
            FormatPart::Date => write_date(buf, record.timestamp()),
            FormatPart::Message => write_message(buf, record.message(), record.args()),
        }
    }
}
