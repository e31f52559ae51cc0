//! Log sinks handed to each sweep component.
//!
//! Components never log through a global; they hold an `Arc<dyn LogSink>` so
//! embedders and tests decide where per-item lines and the summary go.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) { self.log(Level::Info, message) }
    fn warn(&self, message: &str) { self.log(Level::Warn, message) }
    fn error(&self, message: &str) { self.log(Level::Error, message) }
}

/// Forwards to `tracing`, whose subscriber is installed by the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!(target: "mediasweep", "{}", message),
            Level::Warn => tracing::warn!(target: "mediasweep", "{}", message),
            Level::Error => tracing::error!(target: "mediasweep", "{}", message),
        }
    }
}

/// Keeps every line in memory, in emission order.
#[derive(Debug, Default)]
pub struct CaptureSink {
    lines: Mutex<Vec<(Level, String)>>,
}

impl CaptureSink {
    pub fn new() -> Self { Self::default() }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, m)| m).collect()
    }
}

impl LogSink for CaptureSink {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }
}
