//! Log entry - immutable record of one ingested event

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EventKind;

/// One entry of the append-only event log
///
/// Entries are never mutated or removed; identity is the position in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock time captured when the entry was appended
    pub timestamp: DateTime<Utc>,

    pub kind: EventKind,

    /// Human-readable message, empty when none is derivable
    #[serde(default)]
    pub entry: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn new(kind: EventKind, entry: String, error: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            entry,
            error,
        }
    }
}

/// Log entry with its position in the log, as sent to streaming clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencedEntry {
    /// Zero-based position in the log
    pub sequence_id: u64,

    #[serde(flatten)]
    pub entry: LogEntry,
}
