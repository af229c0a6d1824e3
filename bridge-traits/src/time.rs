//! Time and logging abstractions.
//!
//! Injectable time source and host log sink. The clock exists so retry
//! bookkeeping and log timestamps can be made deterministic in tests; the
//! sink lets the core mirror its structured logs into the host platform's
//! pipeline (Logcat/OSLog) without linking against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// Time source trait.
pub trait Clock: Send + Sync {
    /// Get current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Get current Unix timestamp in milliseconds.
    fn unix_timestamp_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// System clock implementation using actual system time.
#[derive(Debug, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Structured log entry forwarded to a [`LoggerSink`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Timestamp.
    pub timestamp: DateTime<Utc>,
    /// Target module/component.
    pub target: String,
    /// Log message.
    pub message: String,
    /// Structured fields captured on the event.
    pub fields: HashMap<String, String>,
}

impl LogEntry {
    /// Entry stamped with the system clock.
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::at(level, SystemClock.now(), target, message)
    }

    /// Entry stamped by the caller, for pipelines that inject a [`Clock`].
    pub fn at(
        level: LogLevel,
        timestamp: DateTime<Utc>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            timestamp,
            target: target.into(),
            message: message.into(),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Logger sink trait.
///
/// Forwards structured logs from the core to host logging pipelines
/// (Logcat on Android, OSLog on iOS, the console elsewhere). Entries below
/// [`min_level`](Self::min_level) may be dropped at the source.
#[async_trait::async_trait]
pub trait LoggerSink: Send + Sync {
    /// Forward a log entry to the host logging system.
    async fn log(&self, entry: LogEntry) -> Result<()>;

    /// Get the minimum log level that will be processed.
    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

/// Console logger implementation for testing/development.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    pub min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
        }
    }
}

#[async_trait::async_trait]
impl LoggerSink for ConsoleLogger {
    async fn log(&self, entry: LogEntry) -> Result<()> {
        if entry.level >= self.min_level {
            let level_str = match entry.level {
                LogLevel::Trace => "TRACE",
                LogLevel::Debug => "DEBUG",
                LogLevel::Info => "INFO",
                LogLevel::Warn => "WARN",
                LogLevel::Error => "ERROR",
            };

            println!(
                "[{}] {} {}: {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
                level_str,
                entry.target,
                entry.message
            );

            if !entry.fields.is_empty() {
                println!("  Fields: {:?}", entry.fields);
            }
        }
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock() {
        let clock = SystemClock;
        let now = clock.now();
        assert!(clock.unix_timestamp_millis() >= now.timestamp_millis());
    }

    #[test]
    fn test_log_entry_builder() {
        let entry = LogEntry::new(LogLevel::Warn, "ads", "Load failed")
            .with_field("unit", "rewarded");

        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.target, "ads");
        assert_eq!(entry.fields.get("unit"), Some(&"rewarded".to_string()));
    }

    #[test]
    fn test_log_entry_explicit_timestamp() {
        use chrono::TimeZone;

        let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let entry = LogEntry::at(LogLevel::Info, stamp, "ads", "Loaded");
        assert_eq!(entry.timestamp, stamp);
    }

    #[tokio::test]
    async fn test_console_logger() {
        let logger = ConsoleLogger::default();
        let entry = LogEntry::new(LogLevel::Info, "test", "Test log");

        logger.log(entry).await.unwrap();
    }
}
