//! Storage area and coordinate routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use factory_inventory_core::StorageAreaId;

use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAccount;
use crate::models::{
    Coordinate, CreateStorageAreaInput, StorageAreaDetail, StorageAreaFilter,
    UpdateStorageAreaInput,
};
use crate::services::StorageService;
use crate::state::AppState;

/// Build the storage areas router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/storage-areas", get(list).post(create))
        .route("/storage-areas/{id}", get(show).patch(update))
        .route("/storage-areas/{id}/coordinates", get(coordinates))
}

async fn list(
    auth: RequireAccount,
    State(state): State<AppState>,
    Query(filter): Query<StorageAreaFilter>,
) -> Result<Json<Vec<StorageAreaDetail>>, AppError> {
    let areas = StorageService::new(state.pool())
        .list(&auth.actor(), &filter)
        .await?;
    Ok(Json(areas))
}

async fn show(
    auth: RequireAccount,
    State(state): State<AppState>,
    Path(id): Path<StorageAreaId>,
) -> Result<Json<StorageAreaDetail>, AppError> {
    let area = StorageService::new(state.pool()).get(&auth.actor(), id).await?;
    Ok(Json(area))
}

#[instrument(skip_all)]
async fn create(
    auth: RequireAccount,
    State(state): State<AppState>,
    Json(input): Json<CreateStorageAreaInput>,
) -> Result<(StatusCode, Json<StorageAreaDetail>), AppError> {
    let area = StorageService::new(state.pool())
        .create(&auth.actor(), &input)
        .await?;
    Ok((StatusCode::CREATED, Json(area)))
}

/// Description and/or dimensions; a dimension change regenerates the grid.
#[instrument(skip_all)]
async fn update(
    auth: RequireAccount,
    State(state): State<AppState>,
    Path(id): Path<StorageAreaId>,
    Json(input): Json<UpdateStorageAreaInput>,
) -> Result<Json<StorageAreaDetail>, AppError> {
    let area = StorageService::new(state.pool())
        .update(&auth.actor(), id, &input)
        .await?;
    Ok(Json(area))
}

async fn coordinates(
    auth: RequireAccount,
    State(state): State<AppState>,
    Path(id): Path<StorageAreaId>,
) -> Result<Json<Vec<Coordinate>>, AppError> {
    let cells = StorageService::new(state.pool())
        .coordinates(&auth.actor(), id)
        .await?;
    Ok(Json(cells))
}
