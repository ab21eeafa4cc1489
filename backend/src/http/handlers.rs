//! HTTP handlers for the REST API.
//!
//! Each handler validates its input through the extractors in
//! [`super::extract`] and the schemas in [`crate::api`], then delegates to
//! the service layer. Storage is never touched by a request that fails
//! validation.

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{HealthResponse, ListQuery};
use super::error::AppError;
use super::extract::{ItemPath, ValidatedJson};
use super::state::AppState;
use crate::api::{Item, ItemCreate, ItemUpdate};
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            "error".to_string()
        }
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Item CRUD
// =============================================================================

/// POST /items/
pub async fn create_item(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ItemCreate>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let new_item = request.validate()?;
    let item = db_services::create_item(state.repository.as_ref(), &new_item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /items/?skip=&limit=
///
/// Items in ascending id order. `limit` is capped at the configured maximum.
pub async fn list_items(
    State(state): State<AppState>,
    query: ListQuery,
) -> HandlerResult<Vec<Item>> {
    let page = query.resolve(state.config.default_page_limit)?;
    let items = db_services::list_items(
        state.repository.as_ref(),
        page.skip,
        page.limit,
        state.config.max_page_limit,
    )
    .await?;
    Ok(Json(items))
}

/// GET /items/{item_id}
pub async fn get_item(
    State(state): State<AppState>,
    ItemPath(item_id): ItemPath,
) -> HandlerResult<Item> {
    db_services::get_item(state.repository.as_ref(), item_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// PUT /items/{item_id}
///
/// Partial update: absent fields keep their stored value.
pub async fn update_item(
    State(state): State<AppState>,
    ItemPath(item_id): ItemPath,
    ValidatedJson(request): ValidatedJson<ItemUpdate>,
) -> HandlerResult<Item> {
    let changes = request.validate()?;
    db_services::update_item(state.repository.as_ref(), item_id, &changes)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// DELETE /items/{item_id}
pub async fn delete_item(
    State(state): State<AppState>,
    ItemPath(item_id): ItemPath,
) -> Result<StatusCode, AppError> {
    if db_services::delete_item(state.repository.as_ref(), item_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
