//! Leveled, filtered line logging for the HTTP client.
//!
//! Each [`Client`](crate::Client) owns a [`Logger`] configured through
//! [`LogConfig`]. Lines are filtered by [`LogLevel`] and written to a
//! [`LogSink`] as `"<LEVEL>: <prefix><message>"`. The [`LogSink::Tracing`]
//! sink hands the message to the `tracing` subscriber instead, which is what
//! the binary uses.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity of a log line. Lower values are more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Unrecoverable condition.
    #[default]
    Panic = 0,
    /// Failed operation.
    Error = 1,
    /// Unexpected but recoverable condition.
    #[serde(alias = "warn")]
    Warning = 2,
    /// Notable event.
    Info = 3,
    /// Request-level tracing.
    Debug = 4,
}

impl LogLevel {
    /// Lowercase name as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Panic => "panic",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Panic,
            1 => Self::Error,
            2 => Self::Warning,
            3 => Self::Info,
            _ => Self::Debug,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a log level name is not recognized.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log level: {0}")]
pub struct UnknownLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "panic" => Ok(Self::Panic),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(UnknownLogLevel(s.to_string())),
        }
    }
}

/// A writer shared between a logger and its owner.
#[derive(Clone)]
pub struct SharedWriter(Arc<Mutex<dyn Write + Send>>);

impl SharedWriter {
    /// Wraps a writer so it can be used as a [`LogSink`].
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self(Arc::new(Mutex::new(writer)))
    }
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedWriter")
    }
}

/// Destination of log lines.
#[derive(Debug, Clone, Default)]
pub enum LogSink {
    /// Process standard output.
    #[default]
    Stdout,
    /// Process standard error.
    Stderr,
    /// Forward to the installed `tracing` subscriber.
    Tracing,
    /// Caller-supplied writer.
    Writer(SharedWriter),
}

/// Logger options supplied with the client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Where lines go. Not serialized; defaults to stdout.
    #[serde(skip)]
    pub sink: LogSink,
    /// Most verbose level that is emitted.
    pub level: LogLevel,
    /// Text inserted between the level tag and the message.
    pub prefix: String,
}

/// Per-client line logger.
#[derive(Debug)]
pub struct Logger {
    sink: LogSink,
    level: AtomicU8,
    prefix: String,
}

impl Logger {
    /// Creates a logger from its configuration.
    #[must_use]
    pub fn new(config: &LogConfig) -> Self {
        Self {
            sink: config.sink.clone(),
            level: AtomicU8::new(config.level as u8),
            prefix: config.prefix.clone(),
        }
    }

    /// Current filter level.
    #[must_use]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Replaces the filter level.
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether a line at `level` would be emitted.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level()
    }

    /// Emits one line if `level` passes the filter.
    ///
    /// Write failures on the sink are ignored.
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        match &self.sink {
            LogSink::Tracing => self.forward(level, args),
            LogSink::Stdout => {
                let _ = self.write_line(&mut io::stdout().lock(), level, args);
            }
            LogSink::Stderr => {
                let _ = self.write_line(&mut io::stderr().lock(), level, args);
            }
            LogSink::Writer(writer) => {
                if let Ok(mut guard) = writer.0.lock() {
                    let _ = self.write_line(&mut *guard, level, args);
                }
            }
        }
    }

    fn write_line(
        &self,
        out: &mut dyn Write,
        level: LogLevel,
        args: fmt::Arguments<'_>,
    ) -> io::Result<()> {
        let tag = level.as_str().to_ascii_uppercase();
        writeln!(out, "{tag}: {}{args}", self.prefix)?;
        out.flush()
    }

    fn forward(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        let prefix = self.prefix.as_str();
        match level {
            LogLevel::Panic | LogLevel::Error => tracing::error!("{prefix}{args}"),
            LogLevel::Warning => tracing::warn!("{prefix}{args}"),
            LogLevel::Info => tracing::info!("{prefix}{args}"),
            LogLevel::Debug => tracing::debug!("{prefix}{args}"),
        }
    }
}
