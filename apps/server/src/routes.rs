//! # Route Table
//!
//! Wires every endpoint to its handler. The route layout mirrors the
//! resources: categories and products get full CRUD, transactions expose
//! checkout plus a read-only receipt lookup, reports are read-only.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{extract::State, Json, Router};
use serde::Serialize;

use crate::handlers::{category, product, report, transaction};
use crate::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route(
            "/categories",
            get(category::list_categories).post(category::create_category),
        )
        .route(
            "/categories/{id}",
            get(category::get_category)
                .put(category::update_category)
                .delete(category::delete_category),
        )
        .route(
            "/products",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/products/{id}",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
        .route("/transactions/checkout", post(transaction::checkout))
        .route("/transactions/{id}", get(transaction::get_transaction))
        .route("/report", get(report::range_report))
        .route("/report/today", get(report::today_report))
        .with_state(state)
}

/// `GET /`
async fn welcome() -> &'static str {
    "welcome"
}

/// Response body of the health endpoint.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    database: bool,
}

/// `GET /health`
///
/// Returns 503 when the database stops answering, so load balancers can
/// take the instance out of rotation.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;
    let status = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (status.0, Json(HealthResponse { status: status.1, database }))
}
