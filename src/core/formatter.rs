//! Template compiler and renderer
//!
//! A template is literal text with two-character verbs:
//!
//! | verb      | renders                                  |
//! |-----------|------------------------------------------|
//! | `%%`      | a literal `%`                            |
//! | `%l`      | the level's one-character name           |
//! | `%T`      | time of day, `HH:MM:SS[.fraction]`       |
//! | `%D`      | date, `YYYY-MM-DD`                       |
//! | `%m`      | the interpolated message                 |
//! | `%<other>`| the two characters verbatim              |
//!
//! Compiling never fails. A non-empty template always gains a trailing
//! newline, and adjacent literal text is merged into a single part.

use super::format_part::FormatPart;
use super::record::Record;
use super::timestamp::TimePrecision;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

/// `2018-11-19 16:12:34.000056 I message`
pub const DEFAULT_FORMAT: &str = "%D %T %l %m";

/// `[I 16:12:34.000056] message`
pub const COMPACT_FORMAT: &str = "[%l %T] %m";

static DEFAULT_FORMATTER: LazyLock<Arc<Formatter>> =
    LazyLock::new(|| Arc::new(Formatter::parse(DEFAULT_FORMAT)));

static COMPACT_FORMATTER: LazyLock<Arc<Formatter>> =
    LazyLock::new(|| Arc::new(Formatter::parse(COMPACT_FORMAT)));

/// Options applied while compiling a template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterConfig {
    #[serde(default)]
    pub time_precision: TimePrecision,
}

impl FormatterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_time_precision(mut self, precision: TimePrecision) -> Self {
        self.time_precision = precision;
        self
    }
}

/// A compiled template: an immutable sequence of [`FormatPart`]s.
///
/// Formatters are shared behind an `Arc` by any number of handlers and
/// threads; rendering takes `&self` and keeps no state between calls.
///
/// # Examples
///
/// ```
/// use rust_slog::core::{FormatPart, Formatter};
///
/// let formatter = Formatter::parse("ab%lcd");
/// assert_eq!(formatter.parts().len(), 3);
/// assert_eq!(formatter.parts()[1], FormatPart::Level);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formatter {
    parts: Box<[FormatPart]>,
}

impl Formatter {
    /// Compile `template` with default options
    #[must_use]
    pub fn parse(template: &str) -> Self {
        Self::parse_with(template, FormatterConfig::default())
    }

    /// Compile `template` in a single left-to-right pass
    #[must_use]
    pub fn parse_with(template: &str, config: FormatterConfig) -> Self {
        if template.is_empty() {
            return Self::default();
        }

        let mut builder = PartsBuilder::default();
        let mut rest = template.as_bytes();

        while let Some(index) = rest.iter().position(|&b| b == b'%') {
            builder.push_literal(&rest[..index]);

            let Some(&verb) = rest.get(index + 1) else {
                // A trailing '%' has no verb and stays literal.
                builder.push_literal(b"%");
                rest = &[];
                break;
            };

            match verb {
                b'%' => builder.push_literal(b"%"),
                b'l' => builder.push(FormatPart::Level),
                b'T' => builder.push(FormatPart::Time(config.time_precision)),
                b'D' => builder.push(FormatPart::Date),
                b'm' => builder.push(FormatPart::Message),
                other => builder.push_literal(&[b'%', other]),
            }
            rest = &rest[index + 2..];
        }

        builder.push_literal(rest);
        builder.push_literal(b"\n");
        builder.build()
    }

    /// Shared formatter for [`DEFAULT_FORMAT`]
    #[must_use]
    pub fn default_format() -> Arc<Formatter> {
        Arc::clone(&DEFAULT_FORMATTER)
    }

    /// Shared formatter for [`COMPACT_FORMAT`]
    #[must_use]
    pub fn compact_format() -> Arc<Formatter> {
        Arc::clone(&COMPACT_FORMATTER)
    }

    #[must_use]
    pub fn parts(&self) -> &[FormatPart] {
        &self.parts
    }

    /// True for the formatter compiled from an empty template
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Render `record` by appending every part to `buf` in order
    pub fn format(&self, record: &Record<'_>, buf: &mut Vec<u8>) {
        for part in self.parts.iter() {
            part.render(record, buf);
        }
    }

    /// Render `record` into a new buffer
    #[must_use]
    pub fn format_to_vec(&self, record: &Record<'_>) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);
        self.format(record, &mut buf);
        buf
    }
}

/// Accumulates parts, merging each literal into a preceding literal
#[derive(Default)]
struct PartsBuilder {
    parts: Vec<FormatPart>,
}

impl PartsBuilder {
    fn push(&mut self, part: FormatPart) {
        self.parts.push(part);
    }

    fn push_literal(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let merged = match self.parts.last_mut() {
            Some(FormatPart::Byte(b)) => {
                let mut run = Vec::with_capacity(1 + bytes.len());
                run.push(*b);
                run.extend_from_slice(bytes);
                Some(run)
            }
            Some(FormatPart::Bytes(run)) => {
                let mut run = std::mem::take(run).into_vec();
                run.extend_from_slice(bytes);
                Some(run)
            }
            _ => None,
        };

        match merged {
            Some(run) => {
                if let Some(last) = self.parts.last_mut() {
                    *last = FormatPart::Bytes(run.into_boxed_slice());
                }
            }
            None if bytes.len() == 1 => self.parts.push(FormatPart::Byte(bytes[0])),
            None => self.parts.push(FormatPart::Bytes(bytes.into())),
        }
    }

    fn build(self) -> Formatter {
        Formatter {
            parts: self.parts.into_boxed_slice(),
        }
    }
}
