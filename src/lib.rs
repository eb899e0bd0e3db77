//! Build Events Server
//!
//! Event state and live log broadcasting for a build/deploy orchestrator.
//! Producers report lifecycle events (build, deploy, port-forward); each one
//! is folded into a single state snapshot, appended to an ordered in-memory
//! log and fanned out to every attached subscriber.
//!
//! # Modules
//!
//! - `types`: Event, LogEntry and State data structures
//! - `aggregator`: folds events into the state and derives log messages
//! - `event_log`: append-only log with bounded per-subscriber fan-out
//! - `hub`: single ingestion point tying state and log together
//! - `api`: HTTP / SSE / WebSocket interface
//! - `config`: environment-based configuration
//! - `error`: error types
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use build_events::{start_server, EventHub};
//! use build_events::hub::helpers;
//!
//! #[tokio::main]
//! async fn main() -> build_events::Result<()> {
//!     let hub = Arc::new(EventHub::with_artifacts(["web"]));
//!     let mut server = start_server(hub.clone(), Some("127.0.0.1:50052")).await?;
//!
//!     helpers::build_in_progress(&hub, "web");
//!     helpers::build_complete(&hub, "web");
//!
//!     server.stop().await;
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod event_log;
pub mod hub;
pub mod types;

// Re-export commonly used items at crate root
pub use aggregator::StateAggregator;
pub use api::{start_server, ServerHandle};
pub use config::EventsConfig;
pub use error::{Error, Result};
pub use event_log::{EventLogStore, SubscriberId};
pub use hub::{EventHub, Subscription};
pub use types::{Ack, Event, EventKind, LogEntry, PortInfo, SequencedEntry, State, Status};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
