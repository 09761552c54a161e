//! # Kasir API Server
//!
//! HTTP surface of the Kasir POS backend. Thin orchestration only: handlers
//! validate input, call into `kasir-db`, and map errors to status codes.
//! Business rules live in `kasir-core`; persistence and the atomic checkout
//! live in `kasir-db`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use kasir_db::Database;

/// Shared application state.
///
/// Handlers receive collaborators through this state, never through globals.
/// `Database` is a cheap clone around a shared pool.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
