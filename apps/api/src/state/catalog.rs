//! # Catalog Snapshot
//!
//! The client and quotation lists served by the list endpoints.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  repository write ──commit──► ChangeFeed ──on_change(table)──► Notify   │
//! │                                                                  │      │
//! │                                                                  ▼      │
//! │  GET /api/quotations ◄── watch::Receiver ◄── send_replace ◄── list()    │
//! │                                                                         │
//! │  • every notification re-fetches the whole list (no diffing)           │
//! │  • bursts of notifications collapse into one re-fetch                  │
//! │  • a failed re-fetch keeps the previous snapshot                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::Arc;

use prequote_core::{Client, Quotation};
use prequote_db::{Database, DbResult, Table};
use tokio::sync::{watch, Notify};
use tracing::{debug, warn};

/// Read side of the list snapshots.
#[derive(Debug, Clone)]
pub struct Catalog {
    clients: watch::Receiver<Arc<Vec<Client>>>,
    quotations: watch::Receiver<Arc<Vec<Quotation>>>,
}

impl Catalog {
    /// Loads both lists and keeps them in step with the change feed.
    ///
    /// Listeners are registered before the first load, so a write landing
    /// in between still triggers a re-fetch.
    pub async fn start(db: &Database) -> DbResult<Self> {
        let (clients_tx, clients) = watch::channel(Arc::new(Vec::new()));
        let (quotations_tx, quotations) = watch::channel(Arc::new(Vec::new()));

        follow(db, Table::Clients, clients_tx.clone(), |db| async move {
            db.clients().list().await
        });
        follow(db, Table::Quotations, quotations_tx.clone(), |db| async move {
            db.quotations().list().await
        });

        clients_tx.send_replace(Arc::new(db.clients().list().await?));
        quotations_tx.send_replace(Arc::new(db.quotations().list().await?));

        Ok(Catalog {
            clients,
            quotations,
        })
    }

    /// Current client list, ordered by name.
    pub fn clients(&self) -> Arc<Vec<Client>> {
        self.clients.borrow().clone()
    }

    /// Current quotation list, newest first.
    pub fn quotations(&self) -> Arc<Vec<Quotation>> {
        self.quotations.borrow().clone()
    }

    /// Receiver that wakes whenever the quotation list is replaced.
    pub fn watch_quotations(&self) -> watch::Receiver<Arc<Vec<Quotation>>> {
        self.quotations.clone()
    }

    /// Receiver that wakes whenever the client list is replaced.
    pub fn watch_clients(&self) -> watch::Receiver<Arc<Vec<Client>>> {
        self.clients.clone()
    }
}

/// Re-runs `load` after every change to `table` and publishes the result.
fn follow<T, F, Fut>(db: &Database, table: Table, tx: watch::Sender<Arc<Vec<T>>>, load: F)
where
    T: Send + Sync + 'static,
    F: Fn(Database) -> Fut + Send + 'static,
    Fut: Future<Output = DbResult<Vec<T>>> + Send + 'static,
{
    let pending = Arc::new(Notify::new());
    let signal = pending.clone();
    db.on_change(table, move |_| signal.notify_one());

    let db = db.clone();
    tokio::spawn(async move {
        loop {
            pending.notified().await;
            match load(db.clone()).await {
                Ok(list) => {
                    debug!(table = ?table, count = list.len(), "Catalog refreshed");
                    tx.send_replace(Arc::new(list));
                }
                Err(e) => {
                    warn!(table = ?table, error = %e, "Catalog refresh failed, keeping previous snapshot");
                }
            }
        }
    });
}

// =============================================================================
// Unit Tests
// =============================================================================
