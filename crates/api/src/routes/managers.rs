//! Manager assignment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};

use factory_inventory_core::ManagerId;

use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAccount;
use crate::models::{AssignManagerInput, Manager, ManagerFilter, UpdateManagerInput};
use crate::services::ManagerService;
use crate::state::AppState;

/// Build the managers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/managers", get(list).post(assign))
        .route("/managers/{id}", get(show).patch(update))
        .route("/managers/{id}/deactivate", post(deactivate))
}

async fn list(
    auth: RequireAccount,
    State(state): State<AppState>,
    Query(filter): Query<ManagerFilter>,
) -> Result<Json<Vec<Manager>>, AppError> {
    let managers = ManagerService::new(state.pool())
        .list(&auth.actor(), &filter)
        .await?;
    Ok(Json(managers))
}

async fn show(
    auth: RequireAccount,
    State(state): State<AppState>,
    Path(id): Path<ManagerId>,
) -> Result<Json<Manager>, AppError> {
    let manager = ManagerService::new(state.pool()).get(&auth.actor(), id).await?;
    Ok(Json(manager))
}

#[instrument(skip_all)]
async fn assign(
    auth: RequireAccount,
    State(state): State<AppState>,
    Json(input): Json<AssignManagerInput>,
) -> Result<(StatusCode, Json<Manager>), AppError> {
    let manager = ManagerService::new(state.pool())
        .assign(&auth.actor(), &input)
        .await?;
    Ok((StatusCode::CREATED, Json(manager)))
}

#[instrument(skip_all)]
async fn update(
    auth: RequireAccount,
    State(state): State<AppState>,
    Path(id): Path<ManagerId>,
    Json(input): Json<UpdateManagerInput>,
) -> Result<Json<Manager>, AppError> {
    let manager = ManagerService::new(state.pool())
        .update(&auth.actor(), id, &input)
        .await?;
    Ok(Json(manager))
}

#[instrument(skip_all)]
async fn deactivate(
    auth: RequireAccount,
    State(state): State<AppState>,
    Path(id): Path<ManagerId>,
) -> Result<Json<Manager>, AppError> {
    let manager = ManagerService::new(state.pool())
        .deactivate(&auth.actor(), id)
        .await?;
    Ok(Json(manager))
}
