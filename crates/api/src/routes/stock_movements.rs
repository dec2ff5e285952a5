//! Stock ledger routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAccount;
use crate::models::{CreateMovementInput, MovementFilter, MovementReceipt, StockMovement};
use crate::services::LedgerService;
use crate::state::AppState;

/// Build the stock movements router.
pub fn router() -> Router<AppState> {
    Router::new().route("/stock-movements", get(list).post(create))
}

async fn list(
    auth: RequireAccount,
    State(state): State<AppState>,
    Query(filter): Query<MovementFilter>,
) -> Result<Json<Vec<StockMovement>>, AppError> {
    let movements = LedgerService::new(state.pool())
        .list(&auth.actor(), &filter)
        .await?;
    Ok(Json(movements))
}

/// Book a movement. Responds with the entry and the resulting stock.
#[instrument(skip_all)]
async fn create(
    auth: RequireAccount,
    State(state): State<AppState>,
    Json(input): Json<CreateMovementInput>,
) -> Result<(StatusCode, Json<MovementReceipt>), AppError> {
    let receipt = LedgerService::new(state.pool())
        .apply_movement(&auth.actor(), &input)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
