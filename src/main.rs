//! Build Events Server - Binary Entry Point
//!
//! Serves the event API on `EVENTS_LISTEN_ADDR` until Ctrl+C.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use build_events::{start_server, EventHub, EventsConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "build_events=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting {} v{}", build_events::NAME, build_events::VERSION);

    let config = EventsConfig::from_env().context("reading configuration")?;
    if config.listen_addr.is_none() {
        warn!("EVENTS_LISTEN_ADDR is not set, nothing to serve");
        return Ok(());
    }

    let hub = Arc::new(EventHub::from_config(&config));
    let mut server = start_server(hub, config.listen_addr.as_deref())
        .await
        .context("starting event API")?;

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl+C")?;

    info!("Shutting down");
    server.stop().await.context("stopping event API")?;
    Ok(())
}
