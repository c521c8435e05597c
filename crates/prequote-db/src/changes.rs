//! # Change Feed
//!
//! In-process notifications of committed mutations.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Repository write ──► COMMIT ──► ChangeFeed::publish(ChangeEvent)      │
//! │                                        │                                │
//! │                         broadcast::channel(capacity)                   │
//! │                  ┌─────────────────────┼─────────────────────┐          │
//! │                  ▼                     ▼                     ▼          │
//! │          ChangeSubscription    on_change(Clients)     SSE stream       │
//! │                                                                         │
//! │  A subscriber that falls more than `capacity` events behind receives   │
//! │  FeedMessage::Resync and should re-fetch everything it shows.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Events carry no payload beyond the affected id: listeners re-read from
//! the database, there is no incremental diff.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default number of events buffered per subscriber.
pub const DEFAULT_CAPACITY: usize = 256;

/// Tables that publish changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Clients,
    Quotations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// One committed create/update/delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    pub id: String,
}

impl ChangeEvent {
    pub fn new(table: Table, kind: ChangeKind, id: impl Into<String>) -> Self {
        ChangeEvent {
            table,
            kind,
            id: id.into(),
        }
    }
}

/// What a subscriber receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    Change(ChangeEvent),
    /// Events were dropped; re-fetch in full.
    Resync,
}

impl FeedMessage {
    /// Whether a listener interested in `table` must react.
    pub fn concerns(&self, table: Table) -> bool {
        match self {
            FeedMessage::Change(event) => event.table == table,
            FeedMessage::Resync => true,
        }
    }
}

// =============================================================================
// Feed
// =============================================================================

/// Broadcast hub for change events. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        ChangeFeed { tx }
    }

    /// Publishes an event. Having no subscribers is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        debug!(table = ?event.table, kind = ?event.kind, id = %event.id, "Publishing change");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> ChangeSubscription {
        ChangeSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Spawns a listener calling `callback` for every message that concerns
    /// `table`, including `Resync`. The task ends when the feed is dropped.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let refresh = Arc::new(Notify::new());
    /// let notify = refresh.clone();
    /// db.on_change(Table::Clients, move |_| notify.notify_one());
    /// ```
    pub fn on_change<F>(&self, table: Table, mut callback: F) -> JoinHandle<()>
    where
        F: FnMut(FeedMessage) + Send + 'static,
    {
        let mut subscription = self.subscribe();
        tokio::spawn(async move {
            while let Some(message) = subscription.recv().await {
                if message.concerns(table) {
                    callback(message);
                }
            }
            debug!(table = ?table, "Change listener stopped");
        })
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        ChangeFeed::new(DEFAULT_CAPACITY)
    }
}

/// A receiver on the change feed.
#[derive(Debug)]
pub struct ChangeSubscription {
    rx: broadcast::Receiver<ChangeEvent>,
}

impl ChangeSubscription {
    /// Waits for the next message. `None` once the feed is gone.
    pub async fn recv(&mut self) -> Option<FeedMessage> {
        match self.rx.recv().await {
            Ok(event) => Some(FeedMessage::Change(event)),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Change subscriber lagged, requesting resync");
                Some(FeedMessage::Resync)
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let feed = ChangeFeed::new(8);
        let mut sub = feed.subscribe();
        feed.publish(ChangeEvent::new(Table::Clients, ChangeKind::Created, "c-1"));

        assert_eq!(
            sub.recv().await,
            Some(FeedMessage::Change(ChangeEvent::new(
                Table::Clients,
                ChangeKind::Created,
                "c-1"
            )))
        );
    }

    #[tokio::test]
    async fn test_lagging_subscriber_gets_resync() {
        let feed = ChangeFeed::new(2);
        let mut sub = feed.subscribe();
        for i in 0..5 {
            feed.publish(ChangeEvent::new(Table::Quotations, ChangeKind::Updated, i.to_string()));
        }
        assert_eq!(sub.recv().await, Some(FeedMessage::Resync));
    }

    #[tokio::test]
    async fn test_closed_feed_ends_subscription() {
        let feed = ChangeFeed::new(2);
        let mut sub = feed.subscribe();
        drop(feed);
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_on_change_filters_by_table() {
        let feed = ChangeFeed::new(8);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handle = feed.on_change(Table::Quotations, move |msg| {
            sink.lock().unwrap().push(msg);
        });

        feed.publish(ChangeEvent::new(Table::Clients, ChangeKind::Created, "c-1"));
        feed.publish(ChangeEvent::new(Table::Quotations, ChangeKind::Deleted, "q-1"));
        drop(feed);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(matches!(&seen[0], FeedMessage::Change(e) if e.id == "q-1"));
    }

    #[test]
    fn test_message_serialization() {
        let json = serde_json::to_value(FeedMessage::Resync).unwrap();
        assert_eq!(json["type"], "resync");
        let json = serde_json::to_value(FeedMessage::Change(ChangeEvent::new(
            Table::Clients,
            ChangeKind::Deleted,
            "c-9",
        )))
        .unwrap();
        assert_eq!(json["type"], "change");
        assert_eq!(json["table"], "clients");
        assert_eq!(json["kind"], "deleted");
    }
}
