//! # State Module
//!
//! Shared application state handed to every handler.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────────┐      │
//! │  │   Database   │  │     Catalog      │  │   ExportSettings     │      │
//! │  │              │  │                  │  │                      │      │
//! │  │  SqlitePool  │  │  client list     │  │  company name        │      │
//! │  │  ChangeFeed  │  │  quotation list  │  │  file prefix, fonts  │      │
//! │  └──────────────┘  └──────────────────┘  └──────────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Database: internal connection pool, cheap to clone                  │
//! │  • Catalog: watch receivers, replaced wholesale by refresh tasks       │
//! │  • ExportSettings: read-only after startup, behind an Arc              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;

use std::sync::Arc;

use prequote_db::{Database, DbResult};

pub use crate::config::ExportSettings;
pub use catalog::Catalog;

/// Default request body limit (16 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub catalog: Catalog,
    pub export: Arc<ExportSettings>,
    pub body_limit: usize,
}

impl AppState {
    /// Builds the state and starts the catalog refresh tasks.
    pub async fn new(db: Database, export: ExportSettings, body_limit: usize) -> DbResult<Self> {
        let catalog = Catalog::start(&db).await?;
        Ok(AppState {
            db,
            catalog,
            export: Arc::new(export),
            body_limit,
        })
    }
}
