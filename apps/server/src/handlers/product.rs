//! # Product Handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use kasir_core::validation::{validate_price, validate_product_name, validate_stock};
use kasir_core::Product;
use kasir_db::NewProduct;

/// Create/update payload for a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub stock: i64,
    pub category_id: String,
    pub picture_url: Option<String>,
}

impl ProductPayload {
    fn validate(&self) -> Result<(), ApiError> {
        validate_product_name(&self.name)?;
        validate_price(self.price)?;
        validate_stock(self.stock)?;
        if self.category_id.trim().is_empty() {
            return Err(ApiError::validation("category_id is required"));
        }
        Ok(())
    }

    fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price,
            stock: self.stock,
            category_id: self.category_id,
            picture_url: self.picture_url,
        }
    }
}

/// Query parameters of the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Optional substring filter on the product name.
    pub name: Option<String>,
}

/// Response body for deletions.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// `GET /products`
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    debug!(filter = ?params.name, "list_products");

    let products = state.db.products().list(params.name.as_deref()).await?;
    Ok(Json(products))
}

/// `POST /products`
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    payload.validate()?;

    let product = state
        .db
        .products()
        .insert(&payload.into_new_product())
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    Ok(Json(product))
}

/// `PUT /products/{id}`
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, ApiError> {
    payload.validate()?;

    state
        .db
        .products()
        .update(&id, &payload.into_new_product())
        .await?;

    // Re-read so the response carries the resolved category name
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    Ok(Json(product))
}

/// `DELETE /products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.db.products().delete(&id).await?;

    Ok(Json(DeleteResponse {
        message: "product deleted".to_string(),
    }))
}
