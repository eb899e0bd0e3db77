//! Event Hub - single ingestion point for producers
//!
//! The hub owns the [`StateAggregator`] and the [`EventLogStore`] behind one
//! mutex. Every ingested event is applied to the state and appended to the
//! log inside that critical section, and subscribers register inside it too,
//! so:
//!
//! - the state is always the fold of the log in append order
//! - a new subscriber's history and its live channel meet with no gap and
//!   no overlap
//!
//! Producers never wait on readers: fan-out uses bounded buffers and drops
//! subscribers that fall behind.

pub mod helpers;
mod subscription;

pub use subscription::Subscription;

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::aggregator::StateAggregator;
use crate::config::EventsConfig;
use crate::event_log::{EventLogStore, SubscriberId, DEFAULT_SUBSCRIBER_BUFFER};
use crate::types::{Ack, Event, LogEntry, SequencedEntry, State};

struct HubInner {
    aggregator: StateAggregator,
    log: EventLogStore,
}

/// Shared event state and log
pub struct EventHub {
    inner: Mutex<HubInner>,
    subscriber_buffer: usize,
}

impl EventHub {
    /// Create a hub with an empty state and log
    pub fn new() -> Self {
        Self::with_state(State::new())
    }

    /// Create a hub starting from a seeded state
    pub fn with_state(state: State) -> Self {
        Self {
            inner: Mutex::new(HubInner {
                aggregator: StateAggregator::with_state(state),
                log: EventLogStore::new(),
            }),
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
        }
    }

    /// Create a hub whose build state lists every artifact as not started
    pub fn with_artifacts<I, S>(artifacts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_state(State::with_artifacts(artifacts))
    }

    /// Create a hub from configuration
    pub fn from_config(config: &EventsConfig) -> Self {
        Self::with_artifacts(config.artifacts.iter().cloned())
            .with_subscriber_buffer(config.subscriber_buffer)
    }

    /// Set how many entries a subscriber may lag behind before it is dropped
    pub fn with_subscriber_buffer(mut self, capacity: usize) -> Self {
        self.subscriber_buffer = capacity.max(1);
        self
    }

    /// Ingest one event
    ///
    /// Applies the event to the state, records a log entry carrying the
    /// derived message and the event's error verbatim, and fans the entry out.
    /// Unknown kinds are recorded without touching the state. Always acks.
    pub fn handle(&self, event: Event) -> Ack {
        let mut inner = self.inner.lock();

        let message = inner.aggregator.apply(&event);
        let entry = LogEntry::new(event.kind, message, event.error);
        let sequence_id = inner.log.append(entry);

        debug!(kind = %event.kind, status = %event.status, sequence_id, "Event ingested");
        Ack::default()
    }

    /// Point-in-time copy of the state
    pub fn state(&self) -> State {
        self.inner.lock().aggregator.snapshot()
    }

    /// Full log history
    pub fn history(&self) -> Vec<LogEntry> {
        self.inner.lock().log.snapshot()
    }

    /// Full log history, each entry tagged with its position
    pub fn sequenced_history(&self) -> Vec<SequencedEntry> {
        self.inner.lock().log.sequenced()
    }

    /// Attach a new subscriber
    ///
    /// The returned subscription carries the history as of attach time and
    /// receives every later entry. Dropping it unsubscribes.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let registration = self.inner.lock().log.subscribe(self.subscriber_buffer);
        Subscription::new(registration, Arc::clone(self))
    }

    /// Detach a subscriber; safe to call more than once
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.inner.lock().log.unsubscribe(id)
    }

    /// Number of entries in the log
    pub fn log_len(&self) -> usize {
        self.inner.lock().log.len()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().log.subscriber_count()
    }

    pub fn subscriber_buffer(&self) -> usize {
        self.subscriber_buffer
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventKind, PortInfo, Status};

    #[test]
    fn test_handle_records_state_and_log() {
        let hub = EventHub::new();

        hub.handle(Event::build("artifact-a", Status::InProgress));
        hub.handle(Event::build("artifact-a", Status::Complete));
        hub.handle(Event::deploy(Status::InProgress));
        hub.handle(Event::deploy(Status::Complete));
        hub.handle(Event::port(PortInfo::new(8080, 80)));

        let state = hub.state();
        assert_eq!(state.artifact_status("artifact-a"), Some(Status::Complete));
        assert_eq!(state.deploy_state.status, Status::Complete);
        assert_eq!(state.port_state.forwarded_ports, vec![PortInfo::new(8080, 80)]);

        let messages: Vec<String> = hub.history().into_iter().map(|e| e.entry).collect();
        assert_eq!(
            messages,
            vec![
                "Build started for artifact artifact-a",
                "Build completed for artifact artifact-a",
                "Deploy started",
                "Deploy complete",
                "",
            ]
        );
    }

    #[test]
    fn test_error_is_copied_verbatim() {
        let hub = EventHub::new();

        hub.handle(Event::build("artifact-x", Status::Failed).with_error("exit status 1"));

        let history = hub.history();
        assert_eq!(history[0].entry, "Build failed for artifact artifact-x");
        assert_eq!(history[0].error.as_deref(), Some("exit status 1"));
        assert_eq!(history[0].kind, EventKind::Build);
    }

    #[test]
    fn test_unknown_kind_is_acked_and_logged_without_state_change() {
        let hub = EventHub::with_artifacts(["app"]);
        let before = hub.state();

        let ack = hub.handle(Event::new(EventKind::Unknown, Status::Complete).with_artifact("app"));

        assert_eq!(ack, Ack::default());
        assert_eq!(hub.state(), before);
        assert_eq!(hub.log_len(), 1);
        assert!(hub.history()[0].entry.is_empty());
    }

    #[test]
    fn test_sequenced_history_numbers_entries_in_order() {
        let hub = EventHub::new();
        hub.handle(Event::deploy(Status::InProgress));
        hub.handle(Event::deploy(Status::Complete));

        let history = hub.sequenced_history();
        let ids: Vec<u64> = history.iter().map(|e| e.sequence_id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(history[1].entry.entry, "Deploy complete");
    }

    #[test]
    fn test_subscription_drop_unsubscribes() {
        let hub = Arc::new(EventHub::new());

        let sub = hub.subscribe();
        let id = sub.id();
        assert_eq!(hub.subscriber_count(), 1);

        drop(sub);
        assert_eq!(hub.subscriber_count(), 0);
        assert!(!hub.unsubscribe(id));
    }

    #[test]
    fn test_zero_buffer_is_clamped() {
        let hub = EventHub::new().with_subscriber_buffer(0);
        assert_eq!(hub.subscriber_buffer(), 1);
    }
}
