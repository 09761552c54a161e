//! # Category Handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use kasir_core::validation::validate_category_name;
use kasir_core::{Category, CategorySummary};

/// Create/update payload for a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub description: Option<String>,
}

/// Query parameters of the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Optional substring filter on the category name.
    pub name: Option<String>,
}

/// Response body for deletions.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// `GET /categories`
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CategorySummary>>, ApiError> {
    debug!(filter = ?params.name, "list_categories");

    let categories = state.db.categories().list(params.name.as_deref()).await?;
    Ok(Json(categories))
}

/// `POST /categories`
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    validate_category_name(&payload.name)?;

    let category = state
        .db
        .categories()
        .insert(payload.name.trim(), payload.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// `GET /categories/{id}`
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .db
        .categories()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", &id))?;

    Ok(Json(category))
}

/// `PUT /categories/{id}`
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, ApiError> {
    validate_category_name(&payload.name)?;

    state
        .db
        .categories()
        .update(&id, payload.name.trim(), payload.description.as_deref())
        .await?;

    Ok(Json(Category {
        id,
        name: payload.name.trim().to_string(),
        description: payload.description,
    }))
}

/// `DELETE /categories/{id}`
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.db.categories().delete(&id).await?;

    Ok(Json(DeleteResponse {
        message: "category deleted".to_string(),
    }))
}
