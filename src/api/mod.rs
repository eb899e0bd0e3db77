//! API module for the HTTP, SSE and WebSocket endpoints
//!
//! ## Endpoints
//! - `GET /v1/state` - current state snapshot
//! - `GET /v1/events` - SSE stream: full history, then live entries
//! - `POST /v1/events` - ingest one event
//! - `GET /v1/events/history` - log history as a JSON array
//! - `GET /v1/ws` - WebSocket carrying the same stream as `/v1/events`
//! - `GET /health` - liveness

pub mod http;
pub mod rest;
pub mod sse;
pub mod websocket;

pub use http::{create_router, start_server, ServerHandle};

use std::sync::Arc;

use tokio::sync::watch;

use crate::hub::EventHub;

/// Shared state for all endpoints
pub struct AppState {
    /// The event hub
    pub hub: Arc<EventHub>,

    /// Flipped to `true` when the server is stopping; open streams end on it
    shutdown: watch::Sender<bool>,
}

impl AppState {
    pub fn new(hub: Arc<EventHub>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self { hub, shutdown }
    }

    /// Ask every open stream to finish
    pub fn request_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}

/// Resolve once shutdown has been requested
///
/// A dropped sender is not a request: the receiver then waits forever and the
/// stream ends on its own terms.
pub(crate) async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
