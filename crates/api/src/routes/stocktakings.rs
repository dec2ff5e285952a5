//! Stocktaking routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAccount;
use crate::models::{RecordCountInput, Stocktaking, StocktakingFilter};
use crate::services::StocktakingService;
use crate::state::AppState;

/// Build the stocktakings router.
pub fn router() -> Router<AppState> {
    Router::new().route("/stocktakings", get(list).post(create))
}

async fn list(
    auth: RequireAccount,
    State(state): State<AppState>,
    Query(filter): Query<StocktakingFilter>,
) -> Result<Json<Vec<Stocktaking>>, AppError> {
    let counts = StocktakingService::new(state.pool())
        .list(&auth.actor(), &filter)
        .await?;
    Ok(Json(counts))
}

#[instrument(skip_all)]
async fn create(
    auth: RequireAccount,
    State(state): State<AppState>,
    Json(input): Json<RecordCountInput>,
) -> Result<(StatusCode, Json<Stocktaking>), AppError> {
    let count = StocktakingService::new(state.pool())
        .record_count(&auth.actor(), &input)
        .await?;
    Ok((StatusCode::CREATED, Json(count)))
}
