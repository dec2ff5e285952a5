//! Unified error handling for the HTTP layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use factory_inventory_core::AccountId;

use crate::db::RepositoryError;
use crate::services::ServiceError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Malformed or rejected input.
    #[error("{0}")]
    Validation(String),

    /// No authenticated account.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (or outside the caller's scope).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Concurrent update; retry.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Outbound movement exceeds stock on hand.
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) => Self::Validation(m),
            ServiceError::PermissionDenied(m) => Self::Forbidden(m),
            ServiceError::NotFound(m) => Self::NotFound(m),
            ServiceError::InsufficientStock {
                available,
                requested,
            } => Self::InsufficientStock {
                available,
                requested,
            },
            ServiceError::Conflict(m) => Self::Conflict(m),
            ServiceError::Repository(e) => Self::Database(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InsufficientStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::Database(_) | Self::Internal(_) => "internal",
            Self::Validation(_) => "validation",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "permission_denied",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::InsufficientStock { .. } => "insufficient_stock",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Validation(m) | Self::Conflict(m) => m.clone(),
            _ => self.to_string(),
        };

        let body = ErrorBody {
            error: message,
            code: self.code(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Set the Sentry user context from the authenticated account.
pub fn set_sentry_user(account_id: &AccountId, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(account_id.to_string()),
            email: Some(email.to_owned()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    async fn body_json(err: AppError) -> serde_json::Value {
        let bytes = err
            .into_response()
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("item PROD-001".to_string());
        assert_eq!(err.to_string(), "Not found: item PROD-001");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::InsufficientStock {
                available: 100,
                requested: 150
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_mapping() {
        let err: AppError = ServiceError::PermissionDenied("no".into()).into();
        assert_eq!(get_status(err), StatusCode::FORBIDDEN);

        let err: AppError = ServiceError::Repository(RepositoryError::NotFound).into();
        assert_eq!(get_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_validation_body_is_verbatim() {
        let body = body_json(AppError::Validation("item code already exists".into())).await;
        assert_eq!(body["error"], "item code already exists");
        assert_eq!(body["code"], "validation");
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let body = body_json(AppError::Database(RepositoryError::DataCorruption(
            "secret row detail".into(),
        )))
        .await;
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["code"], "internal");
    }

    #[tokio::test]
    async fn test_insufficient_stock_body() {
        let body = body_json(AppError::InsufficientStock {
            available: 100,
            requested: 150,
        })
        .await;
        assert_eq!(body["code"], "insufficient_stock");
        assert_eq!(
            body["error"],
            "Insufficient stock: 100 available, 150 requested"
        );
    }
}
