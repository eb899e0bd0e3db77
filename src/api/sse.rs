//! SSE event log stream

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use futures::StreamExt;
use serde::Serialize;
use tracing::debug;

use super::{wait_for_shutdown, AppState};
use crate::types::SequencedEntry;

/// Error notification sent before the stream closes early
#[derive(Debug, Clone, Serialize)]
pub struct StreamError {
    pub code: String,
    pub message: String,
}

impl StreamError {
    /// The hub dropped this subscriber because it fell behind
    pub fn dropped() -> Self {
        Self {
            code: "dropped".to_string(),
            message: "Subscriber fell too far behind and was dropped, please reconnect".to_string(),
        }
    }
}

enum Next {
    Entry(SequencedEntry),
    Dropped,
    Shutdown,
}

fn log_event(entry: &SequencedEntry) -> Event {
    Event::default()
        .event("log_entry")
        .id(entry.sequence_id.to_string())
        .data(serde_json::to_string(entry).unwrap_or_default())
}

/// GET /v1/events - history replay followed by live entries
///
/// The subscription lives inside the stream, so it is released when the
/// client disconnects and axum drops the response body.
pub async fn event_log_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let subscription = state.hub.subscribe();
    let mut shutdown = state.shutdown_receiver();
    let id = subscription.id();
    debug!(subscriber = %id, history = subscription.history().len(), "SSE client attached");

    // Replayed history first, then live entries; ends once the hub drops us
    let mut entries = Box::pin(subscription.into_stream());

    let stream = async_stream::stream! {
        loop {
            // Entries already received go out before shutdown is looked at
            let next = tokio::select! {
                biased;
                entry = entries.next() => match entry {
                    Some(entry) => Next::Entry(entry),
                    None => Next::Dropped,
                },
                _ = wait_for_shutdown(&mut shutdown) => Next::Shutdown,
            };

            match next {
                Next::Entry(entry) => yield Ok::<_, Infallible>(log_event(&entry)),
                Next::Dropped => {
                    yield Ok(Event::default()
                        .event("error")
                        .data(serde_json::to_string(&StreamError::dropped()).unwrap_or_default()));
                    break;
                }
                Next::Shutdown => break,
            }
        }

        debug!(subscriber = %id, "SSE stream finished");
    };

    Sse::new(stream).keep_alive(KeepAlive::default().interval(Duration::from_secs(30)))
}
