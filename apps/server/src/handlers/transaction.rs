//! # Transaction Handlers
//!
//! The checkout endpoint is a pass-through: deserialize, hand the items to
//! the checkout engine, serialize the persisted transaction. All of the
//! interesting work (validation, pricing, atomicity) happens in the engine.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use kasir_core::{CheckoutItem, Transaction};

/// Request body of `POST /transactions/checkout`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

/// `POST /transactions/checkout`
pub async fn checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<Transaction>, ApiError> {
    debug!(items = request.items.len(), "checkout");

    let transaction = state.db.checkout().checkout(&request.items).await?;
    Ok(Json(transaction))
}

/// `GET /transactions/{id}`
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = state
        .db
        .transactions()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction", &id))?;

    Ok(Json(transaction))
}
