//! Event Log Store - append-only log with live fan-out
//!
//! The store holds every [`LogEntry`] ever appended plus the set of live
//! subscriber channels. It takes `&mut self` for every mutation; callers keep
//! it behind a lock (see [`crate::hub::EventHub`]) so that taking the history
//! and registering a subscriber happen in one critical section.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::types::{LogEntry, SequencedEntry};

/// Default per-subscriber buffer
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 1024;

/// Handle identifying a registered subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub_{}", self.0)
    }
}

/// Result of registering a subscriber
#[derive(Debug)]
pub struct Registration {
    pub id: SubscriberId,
    /// Every entry appended before the subscriber was registered
    pub history: Vec<SequencedEntry>,
    /// Every entry appended after the subscriber was registered
    pub receiver: mpsc::Receiver<SequencedEntry>,
}

struct Subscriber {
    id: SubscriberId,
    tx: mpsc::Sender<SequencedEntry>,
}

/// Append-only log and subscriber registry
pub struct EventLogStore {
    entries: Vec<LogEntry>,
    /// Kept in registration order
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
    /// Subscribers dropped by fan-out because they fell behind or went away
    dropped_subscribers: u64,
}

impl EventLogStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            subscribers: Vec::new(),
            next_subscriber_id: 1,
            dropped_subscribers: 0,
        }
    }

    /// Append an entry and deliver it to every live subscriber
    ///
    /// Delivery never waits: a subscriber whose buffer is full or whose
    /// receiver has been dropped is unsubscribed on the spot. Returns the
    /// sequence id of the new entry.
    pub fn append(&mut self, entry: LogEntry) -> u64 {
        let sequence_id = self.entries.len() as u64;
        self.entries.push(entry.clone());

        if self.subscribers.is_empty() {
            return sequence_id;
        }

        let msg = SequencedEntry { sequence_id, entry };
        let mut dropped = 0u64;

        self.subscribers.retain(|sub| match sub.tx.try_send(msg.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(
                    subscriber = %sub.id,
                    sequence_id,
                    "Subscriber buffer full, dropping slow subscriber"
                );
                dropped += 1;
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(subscriber = %sub.id, "Subscriber channel closed, removing");
                dropped += 1;
                false
            }
        });

        self.dropped_subscribers += dropped;
        sequence_id
    }

    /// Full ordered history
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.clone()
    }

    /// History with sequence ids attached
    pub fn sequenced(&self) -> Vec<SequencedEntry> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| SequencedEntry {
                sequence_id: i as u64,
                entry: entry.clone(),
            })
            .collect()
    }

    /// Register a new subscriber with a buffer of `capacity` entries
    ///
    /// The returned history and the live channel together cover the log with
    /// no gap and no overlap.
    pub fn subscribe(&mut self, capacity: usize) -> Registration {
        let (tx, receiver) = mpsc::channel(capacity.max(1));
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        self.subscribers.push(Subscriber { id, tx });
        debug!(subscriber = %id, history = self.entries.len(), "Subscriber registered");

        Registration {
            id,
            history: self.sequenced(),
            receiver,
        }
    }

    /// Deregister a subscriber
    ///
    /// Idempotent: returns `false` when the subscriber is already gone,
    /// including when fan-out dropped it first.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|sub| sub.id != id);
        let removed = self.subscribers.len() != before;
        if removed {
            debug!(subscriber = %id, "Subscriber unregistered");
        }
        removed
    }

    /// Number of entries in the log
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether a subscriber is still registered
    pub fn is_subscribed(&self, id: SubscriberId) -> bool {
        self.subscribers.iter().any(|sub| sub.id == id)
    }

    /// Total subscribers removed by fan-out
    pub fn dropped_subscribers(&self) -> u64 {
        self.dropped_subscribers
    }
}

impl Default for EventLogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventKind;

    fn entry(msg: &str) -> LogEntry {
        LogEntry::new(EventKind::Deploy, msg.to_string(), None)
    }

    fn messages(entries: &[SequencedEntry]) -> Vec<String> {
        entries.iter().map(|e| e.entry.entry.clone()).collect()
    }

    #[test]
    fn test_append_assigns_sequence_ids() {
        let mut store = EventLogStore::new();

        assert_eq!(store.append(entry("a")), 0);
        assert_eq!(store.append(entry("b")), 1);
        assert_eq!(store.len(), 2);

        let snapshot = store.snapshot();
        assert_eq!(snapshot[0].entry, "a");
        assert_eq!(snapshot[1].entry, "b");
    }

    #[test]
    fn test_subscriber_gets_history_then_live() {
        let mut store = EventLogStore::new();
        for i in 1..=5 {
            store.append(entry(&i.to_string()));
        }

        let mut reg = store.subscribe(16);
        store.append(entry("6"));
        store.append(entry("7"));

        assert_eq!(messages(&reg.history), vec!["1", "2", "3", "4", "5"]);

        let mut live = Vec::new();
        while let Ok(msg) = reg.receiver.try_recv() {
            live.push(msg);
        }
        assert_eq!(messages(&live), vec!["6", "7"]);
        assert_eq!(live[0].sequence_id, 5);
    }

    #[test]
    fn test_full_subscriber_is_dropped_without_affecting_others() {
        let mut store = EventLogStore::new();
        let slow = store.subscribe(1);
        let mut healthy = store.subscribe(16);

        store.append(entry("a"));
        store.append(entry("b"));

        assert!(!store.is_subscribed(slow.id));
        assert!(store.is_subscribed(healthy.id));
        assert_eq!(store.dropped_subscribers(), 1);

        assert_eq!(healthy.receiver.try_recv().unwrap().entry.entry, "a");
        assert_eq!(healthy.receiver.try_recv().unwrap().entry.entry, "b");
    }

    #[test]
    fn test_closed_receiver_is_removed_on_next_append() {
        let mut store = EventLogStore::new();
        let reg = store.subscribe(4);
        drop(reg.receiver);

        assert_eq!(store.subscriber_count(), 1);
        store.append(entry("a"));
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let mut store = EventLogStore::new();
        let reg = store.subscribe(4);

        assert!(store.unsubscribe(reg.id));
        assert!(!store.unsubscribe(reg.id));
        assert_eq!(store.subscriber_count(), 0);
    }
}
