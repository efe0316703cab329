//! Leveled diagnostics consumed by the title extractor.
//!
//! The extractor reports what it sees (peeked bytes, match attempts, encoding
//! anomalies) through a [`Diagnostics`] sink owned by the caller. Emission can
//! never fail a parse: sinks swallow their own errors.

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(Error::UnknownLevel(s.to_string())),
        }
    }
}

impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error => tracing::Level::ERROR,
        }
    }
}

/// A sink for leveled messages with an optional structured value.
///
/// Implementations must be cheap to call: the scanner emits a message for
/// nearly every primitive it runs when debug output is enabled.
pub trait Diagnostics {
    fn log(&self, level: Level, message: &str, value: Option<Value>);

    /// Whether messages at `level` are delivered anywhere.
    ///
    /// Callers use this to skip building values nobody will see.
    fn enabled(&self, _level: Level) -> bool {
        true
    }

    fn debug(&self, message: &str, value: Option<Value>) {
        self.log(Level::Debug, message, value);
    }

    fn info(&self, message: &str, value: Option<Value>) {
        self.log(Level::Info, message, value);
    }

    fn warn(&self, message: &str, value: Option<Value>) {
        self.log(Level::Warn, message, value);
    }

    fn error(&self, message: &str, value: Option<Value>) {
        self.log(Level::Error, message, value);
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn log(&self, level: Level, message: &str, value: Option<Value>) {
        (**self).log(level, message, value);
    }

    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }
}

/// Forwards diagnostics to the installed `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

macro_rules! emit {
    ($mac:ident, $message:expr, $value:expr) => {
        match $value {
            Some(value) => tracing::$mac!(value = %value, "{}", $message),
            None => tracing::$mac!("{}", $message),
        }
    };
}

impl Diagnostics for TracingDiagnostics {
    fn log(&self, level: Level, message: &str, value: Option<Value>) {
        match level {
            Level::Debug => emit!(debug, message, value),
            Level::Info => emit!(info, message, value),
            Level::Warn => emit!(warn, message, value),
            Level::Error => emit!(error, message, value),
        }
    }

    fn enabled(&self, level: Level) -> bool {
        match level {
            Level::Debug => tracing::enabled!(tracing::Level::DEBUG),
            Level::Info => tracing::enabled!(tracing::Level::INFO),
            Level::Warn => tracing::enabled!(tracing::Level::WARN),
            Level::Error => tracing::enabled!(tracing::Level::ERROR),
        }
    }
}

#[derive(Serialize)]
struct Record<'a> {
    date: DateTime<Local>,
    level: Level,
    message: &'a str,
    value: Option<Value>,
}

/// Writes one JSON object per message to `W`, dropping anything below `min_level`.
///
/// ```text
/// {"date":"2026-10-16T09:12:03.120+09:00","level":"DEBUG","message":"peek","value":"t"}
/// ```
pub struct JsonLogger<W> {
    min_level: Level,
    out: Mutex<W>,
}

impl<W: Write> JsonLogger<W> {
    pub fn new(out: W, min_level: Level) -> Self {
        Self {
            min_level,
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_record(out: &mut W, record: &Record<'_>) -> std::io::Result<()> {
        serde_json::to_writer(&mut *out, record)?;
        out.write_all(b"\n")
    }
}

impl<W: Write> Diagnostics for JsonLogger<W> {
    fn log(&self, level: Level, message: &str, value: Option<Value>) {
        if level < self.min_level {
            return;
        }
        let record = Record {
            date: Local::now(),
            level,
            message,
            value,
        };
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = Self::write_record(&mut out, &record) {
            eprintln!("{message}");
            eprintln!("JsonLogger: failed to write record: {err}");
        }
    }

    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }
}
