//! Process logger setup for platform-window applications.

use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default level. `RUST_LOG` overrides it when set.
    #[serde(default = "default_level")]
    pub level: LogLevel,

    /// Print thread names; handy for telling the pump thread apart.
    #[serde(default = "default_thread_names")]
    pub thread_names: bool,
}

fn default_level() -> LogLevel {
    LogLevel::Info
}

fn default_thread_names() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            thread_names: default_thread_names(),
        }
    }
}

/// Install `env_logger` as the global logger.
///
/// Returns `false` if a logger was already installed (e.g. by a test harness).
pub fn init(config: &LogConfig) -> bool {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(config.level.into());
    builder.parse_default_env();

    if config.thread_names {
        builder.format(|buf, record| {
            use std::io::Write;
            let thread = std::thread::current();
            writeln!(
                buf,
                "[{} {:<5} {} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                thread.name().unwrap_or("?"),
                record.target(),
                record.args()
            )
        });
    }

    builder.is_test(false).try_init().is_ok()
}
