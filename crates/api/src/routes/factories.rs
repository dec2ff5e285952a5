//! Factory routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use factory_inventory_core::FactoryId;

use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAccount;
use crate::models::{CreateFactoryInput, Factory, FactorySummary, UpdateFactoryInput};
use crate::services::FactoryService;
use crate::state::AppState;

/// Build the factories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/factories", get(list).post(create))
        .route("/factories/{id}", get(show).patch(update))
}

async fn list(
    auth: RequireAccount,
    State(state): State<AppState>,
) -> Result<Json<Vec<FactorySummary>>, AppError> {
    let factories = FactoryService::new(state.pool()).list(&auth.actor()).await?;
    Ok(Json(factories))
}

async fn show(
    auth: RequireAccount,
    State(state): State<AppState>,
    Path(id): Path<FactoryId>,
) -> Result<Json<FactorySummary>, AppError> {
    let factory = FactoryService::new(state.pool()).get(&auth.actor(), id).await?;
    Ok(Json(factory))
}

#[instrument(skip_all)]
async fn create(
    auth: RequireAccount,
    State(state): State<AppState>,
    Json(input): Json<CreateFactoryInput>,
) -> Result<(StatusCode, Json<Factory>), AppError> {
    let factory = FactoryService::new(state.pool())
        .create(&auth.actor(), &input)
        .await?;
    Ok((StatusCode::CREATED, Json(factory)))
}

#[instrument(skip_all)]
async fn update(
    auth: RequireAccount,
    State(state): State<AppState>,
    Path(id): Path<FactoryId>,
    Json(input): Json<UpdateFactoryInput>,
) -> Result<Json<Factory>, AppError> {
    let factory = FactoryService::new(state.pool())
        .update(&auth.actor(), id, &input)
        .await?;
    Ok(Json(factory))
}
