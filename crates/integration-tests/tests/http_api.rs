//! End-to-end HTTP tests: the real router on an ephemeral port, driven with
//! reqwest.

#![allow(clippy::unwrap_used)]

use axum::http::HeaderName;
use reqwest::{Client, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};

use factory_inventory_api::config::{ApiConfig, DEFAULT_AUTH_HEADER, LogFormat};
use factory_inventory_api::routes;
use factory_inventory_api::state::AppState;
use factory_inventory_integration_tests::TestContext;

/// Serve the API on 127.0.0.1 and return its base URL.
async fn spawn_server(ctx: &TestContext) -> String {
    let config = ApiConfig {
        database_url: SecretString::from(String::new()),
        max_connections: 5,
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
    let app = routes::routes().with_state(AppState::new(config, ctx.pool.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_health_and_authentication() {
    let ctx = TestContext::new().await;
    let base = spawn_server(&ctx).await;
    let client = Client::new();

    let resp = client.get(format!("{base}/health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client.get(format!("{base}/me")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "unauthorized");

    let resp = client
        .get(format!("{base}/me"))
        .header(DEFAULT_AUTH_HEADER, "never-registered")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client
        .get(format!("{base}/me"))
        .header(DEFAULT_AUTH_HEADER, ctx.operator.id.as_str())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["account"]["id"], ctx.operator.id.as_str());
    assert_eq!(body["unrestricted"], true);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_movement_flow_over_http() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let manager = ctx.primary_manager(factory.id).await;
    let item = ctx.item(factory.id, 100).await;
    let base = spawn_server(&ctx).await;
    let client = Client::new();

    let resp = client
        .post(format!("{base}/stock-movements"))
        .header(DEFAULT_AUTH_HEADER, manager.id.as_str())
        .json(&json!({
            "inventory_id": item.item.id,
            "factory_id": factory.id,
            "movement_type": "out",
            "quantity": 30,
            "reason": "line 2"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["stock_quantity"], 70);

    let resp = client
        .post(format!("{base}/stock-movements"))
        .header(DEFAULT_AUTH_HEADER, manager.id.as_str())
        .json(&json!({
            "inventory_id": item.item.id,
            "factory_id": factory.id,
            "movement_type": "out",
            "quantity": 150
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "insufficient_stock");

    let resp = client
        .get(format!("{base}/inventories/{}", item.item.item_code))
        .header(DEFAULT_AUTH_HEADER, manager.id.as_str())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["stock_quantity"], 70);
    assert_eq!(body["is_low_stock"], false);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_out_of_scope_is_not_found_over_http() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let other = ctx.factory().await;
    let outsider = ctx.primary_manager(other.id).await;
    let item = ctx.item(factory.id, 1).await;
    let base = spawn_server(&ctx).await;
    let client = Client::new();

    let resp = client
        .get(format!("{base}/inventories/{}", item.item.item_code))
        .header(DEFAULT_AUTH_HEADER, outsider.id.as_str())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .get(format!("{base}/factories/{}", factory.id))
        .header(DEFAULT_AUTH_HEADER, outsider.id.as_str())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_storage_area_lifecycle_over_http() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let manager = ctx.primary_manager(factory.id).await;
    let base = spawn_server(&ctx).await;
    let client = Client::new();

    let resp = client
        .post(format!("{base}/storage-areas"))
        .header(DEFAULT_AUTH_HEADER, manager.id.as_str())
        .json(&json!({"factory_id": factory.id, "area_name": "k", "width": 3, "height": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let area: Value = resp.json().await.unwrap();
    assert_eq!(area["area_name"], "K");
    assert_eq!(area["total_coordinates"], 6);
    let id = area["id"].as_i64().unwrap();

    let resp = client
        .patch(format!("{base}/storage-areas/{id}"))
        .header(DEFAULT_AUTH_HEADER, manager.id.as_str())
        .json(&json!({"width": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/storage-areas/{id}/coordinates"))
        .header(DEFAULT_AUTH_HEADER, manager.id.as_str())
        .send()
        .await
        .unwrap();
    let cells: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(cells.len(), 4);

    let resp = client
        .post(format!("{base}/storage-areas"))
        .header(DEFAULT_AUTH_HEADER, manager.id.as_str())
        .json(&json!({"factory_id": factory.id, "area_name": "L", "width": 0, "height": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
