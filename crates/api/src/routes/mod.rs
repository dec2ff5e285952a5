//! HTTP route handlers.
//!
//! Thin adapters: extract the account, call one service operation, map the
//! error.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness
//! GET    /health/ready                    - Database reachability
//! GET    /me                              - Account and managed factories
//!
//! GET    /factories                       POST  /factories
//! GET    /factories/{id}                  PATCH /factories/{id}
//!
//! GET    /managers                        POST  /managers
//! GET    /managers/{id}                   PATCH /managers/{id}
//! POST   /managers/{id}/deactivate
//!
//! GET    /storage-areas                   POST  /storage-areas
//! GET    /storage-areas/{id}              PATCH /storage-areas/{id}
//! GET    /storage-areas/{id}/coordinates
//!
//! GET    /inventories                     POST  /inventories
//! GET    /inventories/{item_code}         PATCH /inventories/{item_code}
//! DELETE /inventories/{item_code}
//!
//! GET    /stock-movements                 POST  /stock-movements
//! GET    /stocktakings                    POST  /stocktakings
//!
//! GET    /selection-options               POST  /selection-options
//! POST   /selection-options/{id}/deactivate
//! ```

pub mod factories;
pub mod health;
pub mod inventory;
pub mod managers;
pub mod me;
pub mod selection_options;
pub mod stock_movements;
pub mod stocktakings;
pub mod storage_areas;

use axum::Router;

use crate::state::AppState;

/// Build the complete router, without middleware layers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(me::router())
        .merge(factories::router())
        .merge(managers::router())
        .merge(storage_areas::router())
        .merge(inventory::router())
        .merge(stock_movements::router())
        .merge(stocktakings::router())
        .merge(selection_options::router())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{HeaderName, Request, StatusCode};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{ApiConfig, DEFAULT_AUTH_HEADER, LogFormat};

    /// State whose pool never connects; only routes that don't touch the
    /// database can succeed.
    fn offline_state() -> AppState {
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap();
        let config = ApiConfig {
            database_url: SecretString::from("postgres://nobody@127.0.0.1:1/none"),
            max_connections: 1,
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            auth_header: HeaderName::from_static(DEFAULT_AUTH_HEADER),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            tls: None,
        };
        AppState::new(config, pool)
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        routes()
            .with_state(offline_state())
            .oneshot(request)
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_is_open() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_reports_unreachable_database() {
        let request = Request::get("/health/ready").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_protected_routes_require_account_header() {
        for uri in [
            "/me",
            "/factories",
            "/managers",
            "/storage-areas",
            "/inventories",
            "/stock-movements",
            "/stocktakings",
            "/selection-options",
        ] {
            let request = Request::get(uri).body(Body::empty()).unwrap();
            assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_malformed_account_header_is_unauthorized() {
        let request = Request::get("/me")
            .header(DEFAULT_AUTH_HEADER, "two words")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_movement_without_account_is_rejected_before_body() {
        let request = Request::post("/stock-movements")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"inventory_id":1,"factory_id":1,"movement_type":"out","quantity":150}"#,
            ))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);
    }
}
