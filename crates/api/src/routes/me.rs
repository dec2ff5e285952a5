//! The authenticated account and its factory assignments.

use axum::{Json, Router, extract::State, routing::get};

use crate::error::AppError;
use crate::middleware::RequireAccount;
use crate::models::Me;
use crate::services::AccessService;
use crate::state::AppState;

/// Build the "who am I" router.
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// Account, superuser flag and every active assignment with its permissions.
async fn me(
    RequireAccount(account): RequireAccount,
    State(state): State<AppState>,
) -> Result<Json<Me>, AppError> {
    Ok(Json(AccessService::new(state.pool()).me(account).await?))
}
