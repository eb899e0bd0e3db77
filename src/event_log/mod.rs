//! Event Log Module
//!
//! In-memory, append-only log of [`LogEntry`](crate::types::LogEntry) values
//! with live fan-out to subscribers.
//!
//! # Delivery
//!
//! ```text
//! append(entry) ──► entries.push ──► try_send to each subscriber
//!                                     │
//!                                     ├─ ok      ─► keep
//!                                     └─ full /  ─► unsubscribe
//!                                        closed
//! ```
//!
//! The log is never truncated, so memory grows with the number of events for
//! the lifetime of the process.

mod store;

pub use store::{EventLogStore, Registration, SubscriberId, DEFAULT_SUBSCRIBER_BUFFER};
