//! # Change Events
//!
//! `GET /api/events` streams the change feed as server-sent events so open
//! clients know when to re-fetch their lists.
//!
//! ```text
//! event: change
//! data: {"type":"change","table":"quotations","kind":"created","id":"…"}
//!
//! event: resync
//! data: {"type":"resync"}
//! ```
//!
//! `resync` means events were dropped for this client; it should re-fetch
//! everything.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use prequote_db::FeedMessage;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tracing::{debug, info, warn};

use crate::state::AppState;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// `GET /api/events`
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut subscription = state.db.subscribe();
    let (tx, rx) = mpsc::channel(16);

    info!("Event stream opened");

    tokio::spawn(async move {
        loop {
            let message = tokio::select! {
                message = subscription.recv() => message,
                _ = tx.closed() => break,
            };
            let Some(message) = message else { break };

            let event = match to_event(&message) {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "Failed to encode change event");
                    continue;
                }
            };
            if tx.send(Ok(event)).await.is_err() {
                break;
            }
        }
        debug!("Event stream closed");
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

fn to_event(message: &FeedMessage) -> Result<Event, axum::Error> {
    let name = match message {
        FeedMessage::Change(_) => "change",
        FeedMessage::Resync => "resync",
    };
    Event::default().event(name).json_data(message)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use prequote_db::{ChangeEvent, ChangeKind, Table};

    #[test]
    fn test_event_names() {
        let change = FeedMessage::Change(ChangeEvent::new(Table::Clients, ChangeKind::Created, "c-1"));
        assert!(to_event(&change).is_ok());
        assert!(to_event(&FeedMessage::Resync).is_ok());
    }
}
