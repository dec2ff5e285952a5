//! Selection option routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};

use factory_inventory_core::SelectionOptionId;

use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAccount;
use crate::models::{CreateOptionInput, OptionFilter, SelectionOption};
use crate::services::SelectionOptionService;
use crate::state::AppState;

/// Build the selection options router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/selection-options", get(list).post(create))
        .route("/selection-options/{id}/deactivate", post(deactivate))
}

async fn list(
    _auth: RequireAccount,
    State(state): State<AppState>,
    Query(filter): Query<OptionFilter>,
) -> Result<Json<Vec<SelectionOption>>, AppError> {
    let options = SelectionOptionService::new(state.pool()).list(&filter).await?;
    Ok(Json(options))
}

#[instrument(skip_all)]
async fn create(
    auth: RequireAccount,
    State(state): State<AppState>,
    Json(input): Json<CreateOptionInput>,
) -> Result<(StatusCode, Json<SelectionOption>), AppError> {
    let option = SelectionOptionService::new(state.pool())
        .create(&auth.actor(), &input)
        .await?;
    Ok((StatusCode::CREATED, Json(option)))
}

#[instrument(skip_all)]
async fn deactivate(
    auth: RequireAccount,
    State(state): State<AppState>,
    Path(id): Path<SelectionOptionId>,
) -> Result<Json<SelectionOption>, AppError> {
    let option = SelectionOptionService::new(state.pool())
        .deactivate(&auth.actor(), id)
        .await?;
    Ok(Json(option))
}
