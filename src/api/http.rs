//! HTTP server setup with Axum

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use super::{rest, sse, wait_for_shutdown, websocket, AppState};
use crate::error::{Error, Result};
use crate::hub::EventHub;

/// How long `stop` waits for open connections before aborting the server
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for local tooling
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/v1/state", get(rest::get_state))
        .route(
            "/v1/events",
            get(sse::event_log_handler).post(rest::handle_event),
        )
        .route("/v1/events/history", get(rest::get_history))
        .route("/v1/ws", get(websocket::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

struct Running {
    state: Arc<AppState>,
    task: JoinHandle<std::io::Result<()>>,
}

/// Handle to a started (or disabled) event API
pub struct ServerHandle {
    local_addr: Option<SocketAddr>,
    running: Option<Running>,
}

impl ServerHandle {
    /// Handle for an interface that was never started
    pub fn disabled() -> Self {
        Self {
            local_addr: None,
            running: None,
        }
    }

    /// Address the listener is bound to, if any
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Stop accepting connections, end open streams and close the listener
    ///
    /// A no-op for a disabled handle or one that was already stopped. Returns
    /// [`Error::Serve`] if the server had failed while running.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(Running { state, mut task }) = self.running.take() else {
            return Ok(());
        };

        state.request_shutdown();
        let result = match tokio::time::timeout(STOP_TIMEOUT, &mut task).await {
            Ok(Ok(served)) => served.map_err(Error::Serve),
            Ok(Err(e)) => {
                warn!(error = %e, "Event API task did not finish cleanly");
                Ok(())
            }
            Err(_) => {
                warn!("Event API did not stop in time, aborting");
                task.abort();
                Ok(())
            }
        };
        info!(addr = ?self.local_addr, "Event API stopped");
        result
    }
}

/// Start serving the event API on `addr`
///
/// With no address (or an empty one) nothing is bound and a disabled handle
/// is returned. Otherwise the listener is bound before this returns; a bind
/// failure is reported and leaves nothing running.
pub async fn start_server(hub: Arc<EventHub>, addr: Option<&str>) -> Result<ServerHandle> {
    let Some(addr) = addr.map(str::trim).filter(|a| !a.is_empty()) else {
        debug!("No listen address configured, event API disabled");
        return Ok(ServerHandle::disabled());
    };

    let bind_error = |source| Error::Bind {
        addr: addr.to_string(),
        source,
    };
    let listener = TcpListener::bind(addr).await.map_err(bind_error)?;
    let local_addr = listener.local_addr().map_err(bind_error)?;

    let state = Arc::new(AppState::new(hub));
    let app = create_router(Arc::clone(&state));
    let mut shutdown = state.shutdown_receiver();

    let task = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move { wait_for_shutdown(&mut shutdown).await })
            .await;
        if let Err(ref e) = result {
            warn!(error = %e, "Event API server failed");
        }
        result
    });

    info!(%local_addr, "Event API listening");
    Ok(ServerHandle {
        local_addr: Some(local_addr),
        running: Some(Running { state, task }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let state = Arc::new(AppState::new(Arc::new(EventHub::new())));
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_disabled_server_binds_nothing() {
        let mut handle = start_server(Arc::new(EventHub::new()), None).await.unwrap();

        assert!(!handle.is_running());
        assert!(handle.local_addr().is_none());
        handle.stop().await.unwrap();
    }
}
