//! Inventory item routes.
//!
//! Items are addressed by item code. Stock is changed through
//! `/stock-movements`, never here.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAccount;
use crate::models::{CreateInventoryInput, InventoryFilter, InventoryView, UpdateInventoryInput};
use crate::services::InventoryService;
use crate::state::AppState;

/// Build the inventory router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inventories", get(list).post(create))
        .route(
            "/inventories/{item_code}",
            get(show).patch(update).delete(delete),
        )
}

async fn list(
    auth: RequireAccount,
    State(state): State<AppState>,
    Query(filter): Query<InventoryFilter>,
) -> Result<Json<Vec<InventoryView>>, AppError> {
    let items = InventoryService::new(state.pool())
        .list(&auth.actor(), &filter)
        .await?;
    Ok(Json(items))
}

async fn show(
    auth: RequireAccount,
    State(state): State<AppState>,
    Path(item_code): Path<String>,
) -> Result<Json<InventoryView>, AppError> {
    let item = InventoryService::new(state.pool())
        .get(&auth.actor(), &item_code)
        .await?;
    Ok(Json(item))
}

#[instrument(skip_all)]
async fn create(
    auth: RequireAccount,
    State(state): State<AppState>,
    Json(input): Json<CreateInventoryInput>,
) -> Result<(StatusCode, Json<InventoryView>), AppError> {
    let item = InventoryService::new(state.pool())
        .create(&auth.actor(), &input)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip_all)]
async fn update(
    auth: RequireAccount,
    State(state): State<AppState>,
    Path(item_code): Path<String>,
    Json(input): Json<UpdateInventoryInput>,
) -> Result<Json<InventoryView>, AppError> {
    let item = InventoryService::new(state.pool())
        .update(&auth.actor(), &item_code, &input)
        .await?;
    Ok(Json(item))
}

#[instrument(skip_all)]
async fn delete(
    auth: RequireAccount,
    State(state): State<AppState>,
    Path(item_code): Path<String>,
) -> Result<StatusCode, AppError> {
    InventoryService::new(state.pool())
        .delete(&auth.actor(), &item_code)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
