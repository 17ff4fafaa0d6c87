//! Ordered diagnostics log threaded through every generation step.
//!
//! A [`Log`] is an explicit accumulator: operations take it by value and hand it
//! back inside their [`crate::Outcome`]. Scope markers (`push`/`pop`) give each
//! entry a path so nested operations report hierarchically. Every recorded entry
//! is also mirrored to `tracing`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Severity of a log entry.
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        f.write_str(label)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!(
                "unknown log level '{other}'; expected debug, info, warning or error"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a log entry records.
pub enum LogEvent {
    /// Scope entry; the entry path ends with the opened scope.
    Push,
    /// Scope exit; the entry path ends with the closed scope.
    Pop,
    /// Leveled message.
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Scope names enclosing the entry, outermost first.
    pub path: Vec<String>,
    pub event: LogEvent,
}

impl LogEntry {
    /// Message text, or the scope name for push/pop markers.
    pub fn message(&self) -> &str {
        match &self.event {
            LogEvent::Message(message) => message,
            LogEvent::Push | LogEvent::Pop => self.path.last().map(String::as_str).unwrap_or(""),
        }
    }

    pub fn is_marker(&self) -> bool {
        !matches!(self.event, LogEvent::Message(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Append-only diagnostics log with a current scope path.
pub struct Log {
    entries: Vec<LogEntry>,
    scope: Vec<String>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the scopes currently open, outermost first.
    pub fn current_path(&self) -> &[String] {
        &self.scope
    }

    /// Opens a scope named `name`.
    pub fn push(mut self, name: impl Into<String>) -> Self {
        self.scope.push(name.into());
        tracing::trace!(target: "apigen", scope = %self.scope.join("/"), "enter");
        self.entries.push(LogEntry {
            level: LogLevel::Debug,
            path: self.scope.clone(),
            event: LogEvent::Push,
        });
        self
    }

    /// Closes the innermost open scope.
    ///
    /// Popping with no open scope records a warning instead of a marker.
    pub fn pop(mut self) -> Self {
        if self.scope.is_empty() {
            return self.warning("unbalanced pop: no scope is open");
        }
        let path = self.scope.clone();
        self.scope.pop();
        tracing::trace!(target: "apigen", scope = %path.join("/"), "exit");
        self.entries.push(LogEntry {
            level: LogLevel::Debug,
            path,
            event: LogEvent::Pop,
        });
        self
    }

    pub fn record(mut self, level: LogLevel, message: impl Into<String>) -> Self {
        let message = message.into();
        mirror(level, &self.scope.join("/"), &message);
        self.entries.push(LogEntry {
            level,
            path: self.scope.clone(),
            event: LogEvent::Message(message),
        });
        self
    }

    pub fn debug(self, message: impl Into<String>) -> Self {
        self.record(LogLevel::Debug, message)
    }

    pub fn info(self, message: impl Into<String>) -> Self {
        self.record(LogLevel::Info, message)
    }

    pub fn warning(self, message: impl Into<String>) -> Self {
        self.record(LogLevel::Warning, message)
    }

    pub fn error(self, message: impl Into<String>) -> Self {
        self.record(LogLevel::Error, message)
    }

    /// Starts an independent branch: no entries, same open scopes.
    pub fn fork(&self) -> Log {
        Log {
            entries: Vec::new(),
            scope: self.scope.clone(),
        }
    }

    /// Appends `other` after this log and continues from its scope path.
    ///
    /// Concatenation is associative, so branches produced with [`Log::fork`]
    /// can be joined in any grouping while each keeps its internal order.
    pub fn append(mut self, other: Log) -> Self {
        self.entries.extend(other.entries);
        self.scope = other.scope;
        self
    }

    /// Renders entries at `min_level` and above, indented by scope depth.
    ///
    /// Scope entries are always shown so filtered messages keep their context.
    pub fn render(&self, min_level: LogLevel) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match &entry.event {
                LogEvent::Push => {
                    let depth = entry.path.len().saturating_sub(1);
                    out.push_str(&"  ".repeat(depth));
                    out.push_str(entry.message());
                    out.push('\n');
                }
                LogEvent::Pop => {}
                LogEvent::Message(message) => {
                    if entry.level < min_level {
                        continue;
                    }
                    out.push_str(&"  ".repeat(entry.path.len()));
                    out.push_str(&format!("{:<7} {message}\n", entry.level.to_string()));
                }
            }
        }
        out
    }
}

fn mirror(level: LogLevel, scope: &str, message: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(target: "apigen", scope, "{message}"),
        LogLevel::Info => tracing::info!(target: "apigen", scope, "{message}"),
        LogLevel::Warning => tracing::warn!(target: "apigen", scope, "{message}"),
        LogLevel::Error => tracing::error!(target: "apigen", scope, "{message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{Log, LogEvent, LogLevel};

    #[test]
    fn entries_carry_enclosing_scope_path() {
        let log = Log::new()
            .push("generate")
            .push("Pet")
            .debug("rendering")
            .pop()
            .pop();

        let message = &log.entries()[2];
        assert_eq!(message.path, vec!["generate".to_string(), "Pet".to_string()]);
        assert_eq!(message.message(), "rendering");
        assert_eq!(log.entries()[3].event, LogEvent::Pop);
        assert_eq!(log.entries()[3].message(), "Pet");
        assert!(log.current_path().is_empty());
    }

    #[test]
    fn unbalanced_pop_records_warning() {
        let log = Log::new().pop();
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].level, LogLevel::Warning);
        assert!(!log.entries()[0].is_marker());
    }

    #[test]
    fn append_is_associative() {
        let base = Log::new().push("root");
        let a = base.fork().info("a");
        let b = base.fork().info("b");
        let c = base.fork().info("c");

        let left = a.clone().append(b.clone()).append(c.clone());
        let right = a.append(b.append(c));
        assert_eq!(left, right);
        assert_eq!(left.current_path(), &["root".to_string()]);
    }

    #[test]
    fn render_filters_by_level_and_indents() {
        let log = Log::new()
            .push("generate")
            .debug("hidden")
            .warning("shown")
            .pop();
        let rendered = log.render(LogLevel::Info);
        assert_eq!(rendered, "generate\n  WARNING shown\n");
    }

    #[test]
    fn parses_level_names() {
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
