//! Types for the `log` module.

use serde::{Deserialize, Serialize};

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryLevel {
    /// Debug-level entry
    Debug,
    /// Informational entry
    Info,
    /// Warning entry
    Warn,
    /// Error entry
    Error,
}

impl EntryLevel {
    /// Parses the wire representation of a level.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single entry from the browser's log, as carried by `log.entryAdded`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Entry source kind ("console", "javascript", ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Severity of the entry
    pub level: EntryLevel,
    /// Entry message text; null for entries without one
    #[serde(default)]
    pub text: Option<String>,
    /// Milliseconds since the epoch when the entry was emitted
    #[serde(default)]
    pub timestamp: Option<i64>,
}
