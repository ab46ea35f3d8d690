//! Progress lines written while a scrape runs.
//!
//! Scrapers report what they are doing as human-readable lines tagged with a
//! category. The default sink forwards them to `tracing`; [`MemorySink`] keeps
//! them in call order so a caller can show or inspect them afterwards.

use std::fmt;
use std::sync::Mutex;

use tracing::{debug, info, warn};

/// Category of a progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    /// Request trace: site entered, elapsed time.
    Req,
    Info,
    Error,
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogCategory::Req => "req",
            LogCategory::Info => "info",
            LogCategory::Error => "error",
        };
        f.write_str(name)
    }
}

/// Append-only sink for progress lines.
pub trait LogSink: Send + Sync {
    fn write(&self, category: LogCategory, line: &str);
}

/// Forwards progress lines to `tracing` under the `fd2ppv::progress` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, category: LogCategory, line: &str) {
        match category {
            LogCategory::Req => debug!(target: "fd2ppv::progress", "{}", line),
            LogCategory::Info => info!(target: "fd2ppv::progress", "{}", line),
            LogCategory::Error => warn!(target: "fd2ppv::progress", "{}", line),
        }
    }
}

/// Keeps every line in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(LogCategory, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines written so far.
    pub fn lines(&self) -> Vec<(LogCategory, String)> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Lines of a single category.
    pub fn lines_of(&self, category: LogCategory) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, line)| line)
            .collect()
    }
}

impl LogSink for MemorySink {
    fn write(&self, category: LogCategory, line: &str) {
        // A poisoned lock only means another writer panicked mid-push.
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push((category, line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.write(LogCategory::Req, "-> site");
        sink.write(LogCategory::Info, "fetching");
        sink.write(LogCategory::Error, "failed");
        sink.write(LogCategory::Info, "done");

        let lines = sink.lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], (LogCategory::Req, "-> site".to_string()));
        assert_eq!(sink.lines_of(LogCategory::Info), vec!["fetching", "done"]);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(LogCategory::Req.to_string(), "req");
        assert_eq!(LogCategory::Error.to_string(), "error");
    }
}
