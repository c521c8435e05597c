//! # Repository Module
//!
//! Database repository implementations for Prequote.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.quotations().upsert(id, &input, today)                     │
//! │       ▼                                                                 │
//! │  QuotationRepository                                                   │
//! │  ├── list / get                                                        │
//! │  ├── create / update / upsert   (validated, one transaction)           │
//! │  └── delete                                                            │
//! │       │                                                                 │
//! │       ├── SQL ──► SQLite                                               │
//! │       └── after commit ──► ChangeFeed                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ClientRepository`](client::ClientRepository) - Client CRUD
//! - [`QuotationRepository`](quotation::QuotationRepository) - Quotations
//!   with their components and developments

pub mod client;
pub mod quotation;
