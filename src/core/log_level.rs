//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered severity of a log record.
///
/// The discriminants are dense and start at zero so a level can index a
/// per-level table directly (see [`Level::index`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    #[serde(alias = "DEBUG", alias = "Debug", alias = "D")]
    Debug = 0,
    #[serde(alias = "INFO", alias = "Info", alias = "I")]
    Info = 1,
    #[serde(alias = "WARN", alias = "Warn", alias = "warning", alias = "WARNING", alias = "W")]
    Warn = 2,
    #[serde(alias = "ERROR", alias = "Error", alias = "E")]
    Error = 3,
    #[serde(alias = "CRIT", alias = "Crit", alias = "critical", alias = "CRITICAL", alias = "C")]
    Crit = 4,
}

impl Level {
    /// Number of levels
    pub const COUNT: usize = 5;

    /// Every level in ascending order
    pub const ALL: [Level; Level::COUNT] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Crit,
    ];

    /// One-character display name rendered by the `%l` verb
    #[inline]
    pub const fn short_name(self) -> u8 {
        match self {
            Level::Debug => b'D',
            Level::Info => b'I',
            Level::Warn => b'W',
            Level::Error => b'E',
            Level::Crit => b'C',
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Crit => "CRIT",
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" | "D" => Ok(Level::Debug),
            "INFO" | "I" => Ok(Level::Info),
            "WARN" | "WARNING" | "W" => Ok(Level::Warn),
            "ERROR" | "E" => Ok(Level::Error),
            "CRIT" | "CRITICAL" | "FATAL" | "C" => Ok(Level::Crit),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
