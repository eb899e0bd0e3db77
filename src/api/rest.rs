//! Unary endpoints: state query, history and event ingestion

use std::sync::Arc;

use axum::{extract::State, Json};

use super::AppState;
use crate::types::{self, Ack, Event, SequencedEntry};

/// GET /v1/state - point-in-time copy of the state
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<types::State> {
    Json(state.hub.state())
}

/// GET /v1/events/history - every log entry so far
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<SequencedEntry>> {
    Json(state.hub.sequenced_history())
}

/// POST /v1/events - ingest one event
///
/// Always acks, including for event kinds this server does not know.
pub async fn handle_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<Event>,
) -> Json<Ack> {
    Json(state.hub.handle(event))
}
