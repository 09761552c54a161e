//! # kasir-db: Database Layer for the Kasir POS Backend
//!
//! This crate provides database access for the Kasir backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Kasir Data Flow                                 │
//! │                                                                         │
//! │  HTTP handler (POST /transactions/checkout)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kasir-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Checkout   │  │   │
//! │  │   │   (pool.rs)   │◄───│ category      │◄───│    Engine    │  │   │
//! │  │   │               │    │ product       │    │              │  │   │
//! │  │   │ SqlitePool    │    │ transaction   │    │ one atomic   │  │   │
//! │  │   │ + migrations  │    │ report        │    │ unit per     │  │   │
//! │  │   └───────────────┘    └───────────────┘    │ checkout     │  │   │
//! │  │                                             └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode, foreign keys on)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`checkout`] - The atomic checkout engine

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CheckoutEngine, CheckoutError, CheckoutResult};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::product::{NewProduct, ProductRepository, StockSnapshot};
pub use repository::report::ReportRepository;
pub use repository::transaction::{NewDetail, TransactionRepository};
