//! WebSocket message types

use serde::{Deserialize, Serialize};

use crate::api::sse::StreamError;
use crate::types::SequencedEntry;

/// Server-to-client messages
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once on connect, before the history replay
    Connected {
        /// Number of entries that will be replayed
        history_len: usize,
    },

    /// One log entry, replayed or live
    LogEntry {
        #[serde(flatten)]
        entry: SequencedEntry,
    },

    /// Heartbeat response
    Pong,

    /// The stream is about to close
    Error { code: String, message: String },
}

impl From<StreamError> for ServerMessage {
    fn from(err: StreamError) -> Self {
        ServerMessage::Error {
            code: err.code,
            message: err.message,
        }
    }
}

/// Client-to-server messages
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ping for heartbeat
    Ping,
}
