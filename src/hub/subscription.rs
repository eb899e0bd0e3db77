//! Subscriber handle with guaranteed cleanup

use std::sync::Arc;

use futures::Stream;
use tokio::sync::mpsc;

use super::EventHub;
use crate::event_log::{Registration, SubscriberId};
use crate::types::SequencedEntry;

/// A live attachment to the event log
///
/// Holds the history captured at attach time and the channel of later
/// entries. Dropping the subscription unsubscribes it from the hub, whatever
/// path the owning stream loop exits on.
pub struct Subscription {
    id: SubscriberId,
    history: Vec<SequencedEntry>,
    receiver: mpsc::Receiver<SequencedEntry>,
    hub: Arc<EventHub>,
}

impl Subscription {
    pub(super) fn new(registration: Registration, hub: Arc<EventHub>) -> Self {
        Self {
            id: registration.id,
            history: registration.history,
            receiver: registration.receiver,
            hub,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Entries appended before this subscription was registered
    pub fn history(&self) -> &[SequencedEntry] {
        &self.history
    }

    /// Take the history out, leaving it empty
    pub fn take_history(&mut self) -> Vec<SequencedEntry> {
        std::mem::take(&mut self.history)
    }

    /// Wait for the next live entry
    ///
    /// Returns `None` once the hub has dropped this subscriber (it fell too
    /// far behind) and every buffered entry has been received.
    pub async fn recv(&mut self) -> Option<SequencedEntry> {
        self.receiver.recv().await
    }

    /// Turn the subscription into a stream of history followed by live entries
    pub fn into_stream(mut self) -> impl Stream<Item = SequencedEntry> + Send + 'static {
        let history = self.take_history();

        async_stream::stream! {
            for entry in history {
                yield entry;
            }
            while let Some(entry) = self.recv().await {
                yield entry;
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("history", &self.history.len())
            .finish()
    }
}
