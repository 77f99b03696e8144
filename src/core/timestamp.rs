//! Timestamp rendering for the `%D` and `%T` verbs
//!
//! Dates and times are written digit by digit straight into the output
//! buffer, so rendering a record never allocates for a timestamp.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Fractional-second precision of the time-of-day verb
///
/// # Examples
///
/// ```
/// use rust_slog::core::TimePrecision;
///
/// assert_eq!(TimePrecision::Seconds.digits(), 0);
/// assert_eq!(TimePrecision::default().digits(), 6);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePrecision {
    /// `HH:MM:SS`
    Seconds,
    /// `HH:MM:SS.mmm`
    Millis,
    /// `HH:MM:SS.uuuuuu`
    #[default]
    Micros,
    /// `HH:MM:SS.nnnnnnnnn`
    Nanos,
}

impl TimePrecision {
    /// Number of fractional digits rendered
    #[must_use]
    pub const fn digits(self) -> u32 {
        match self {
            TimePrecision::Seconds => 0,
            TimePrecision::Millis => 3,
            TimePrecision::Micros => 6,
            TimePrecision::Nanos => 9,
        }
    }
}

/// Write `YYYY-MM-DD`
pub fn write_date<Tz: TimeZone>(buf: &mut Vec<u8>, datetime: &DateTime<Tz>) {
    let year = datetime.year();
    if (0..=9999).contains(&year) {
        push_digits(buf, year as u32, 4);
    } else {
        let _ = write!(buf, "{}", year);
    }
    buf.push(b'-');
    push_digits(buf, datetime.month(), 2);
    buf.push(b'-');
    push_digits(buf, datetime.day(), 2);
}

/// Write `HH:MM:SS` plus the fraction selected by `precision`
pub fn write_time<Tz: TimeZone>(buf: &mut Vec<u8>, datetime: &DateTime<Tz>, precision: TimePrecision) {
    push_digits(buf, datetime.hour(), 2);
    buf.push(b':');
    push_digits(buf, datetime.minute(), 2);
    buf.push(b':');
    // Leap seconds are reported by chrono as nanosecond >= 1_000_000_000.
    let nanos = datetime.nanosecond();
    let (second, nanos) = if nanos >= 1_000_000_000 {
        (datetime.second() + 1, nanos - 1_000_000_000)
    } else {
        (datetime.second(), nanos)
    };
    push_digits(buf, second, 2);

    let digits = precision.digits();
    if digits > 0 {
        buf.push(b'.');
        push_digits(buf, nanos / 10u32.pow(9 - digits), digits);
    }
}

/// Push exactly `width` decimal digits of `value`, zero padded
fn push_digits(buf: &mut Vec<u8>, mut value: u32, width: u32) {
    let start = buf.len();
    buf.resize(start + width as usize, b'0');
    for slot in buf[start..].iter_mut().rev() {
        *slot = b'0' + (value % 10) as u8;
        value /= 10;
    }
}
