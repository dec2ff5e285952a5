//! Authentication extractor.
//!
//! Authentication itself happens upstream (reverse proxy or gateway); it
//! forwards the account id in the header named by
//! [`ApiConfig::auth_header`](crate::config::ApiConfig::auth_header). Every
//! route except the health checks requires an account; there is no
//! anonymous fallback.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};

use factory_inventory_core::{AccountId, Actor};

use crate::db::AccountRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::Account;
use crate::state::AppState;

/// Extractor that requires an authenticated, known account.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAccount(account): RequireAccount) -> impl IntoResponse {
///     format!("Hello, {}!", account.email)
/// }
/// ```
pub struct RequireAccount(pub Account);

impl RequireAccount {
    /// The caller identity for service operations.
    #[must_use]
    pub fn actor(&self) -> Actor {
        self.0.actor()
    }
}

/// Why a request was not authenticated.
#[derive(Debug)]
pub enum AuthRejection {
    /// Header absent.
    MissingHeader,
    /// Header present but not a valid account id.
    MalformedHeader,
    /// No such account.
    UnknownAccount,
    /// Account lookup failed.
    Lookup(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::MissingHeader => {
                AppError::Unauthorized("authentication required".to_string()).into_response()
            }
            Self::MalformedHeader => {
                AppError::Unauthorized("malformed account header".to_string()).into_response()
            }
            Self::UnknownAccount => {
                AppError::Unauthorized("unknown account".to_string()).into_response()
            }
            Self::Lookup(e) => e.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAccount {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let account_id = account_id_from_parts(parts, state)?;

        let account = AccountRepository::new(state.pool())
            .get(&account_id)
            .await
            .map_err(|e| AuthRejection::Lookup(e.into()))?
            .ok_or(AuthRejection::UnknownAccount)?;

        set_sentry_user(&account.id, &account.email);
        tracing::Span::current().record("account_id", tracing::field::display(&account.id));

        Ok(Self(account))
    }
}

fn account_id_from_parts(parts: &Parts, state: &AppState) -> Result<AccountId, AuthRejection> {
    let raw = parts
        .headers
        .get(&state.config().auth_header)
        .ok_or(AuthRejection::MissingHeader)?
        .to_str()
        .map_err(|_| AuthRejection::MalformedHeader)?;

    AccountId::parse(raw.trim()).map_err(|_| AuthRejection::MalformedHeader)
}
