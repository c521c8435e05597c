//! # prequote-db: Database Layer for Prequote
//!
//! This crate provides database access for the Prequote system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Prequote Data Flow                               │
//! │                                                                         │
//! │  HTTP handler (PUT /api/quotations/{id})                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   prequote-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ClientRepo    │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ QuotationRepo │    │              │  │   │
//! │  │   │ ChangeFeed    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/prequote/prequote.db (platform data dir)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`changes`] - Change feed published after each commit
//! - [`error`] - Database error types
//! - [`repository`] - Client and quotation repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prequote_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/prequote.db")).await?;
//! let quotation = db.quotations().create(&input, today).await?;
//! assert_eq!(quotation.code, "PC2503001");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod changes;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use changes::{ChangeEvent, ChangeFeed, ChangeKind, ChangeSubscription, FeedMessage, Table};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::client::ClientRepository;
pub use repository::quotation::QuotationRepository;
