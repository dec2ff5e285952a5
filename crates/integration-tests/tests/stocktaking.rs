//! Stocktaking tests: counts are recorded without touching stock.

#![allow(clippy::unwrap_used)]

use factory_inventory_api::models::{RecordCountInput, StocktakingFilter};
use factory_inventory_api::services::{InventoryService, ServiceError, StocktakingService};
use factory_inventory_core::{DiscrepancyKind, ManagerRole, PermissionSet, StocktakingStatus};
use factory_inventory_integration_tests::TestContext;

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_shortage_is_recorded_and_stock_untouched() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let manager = ctx.primary_manager(factory.id).await;
    let item = ctx.item(factory.id, 50).await;

    let count = StocktakingService::new(&ctx.pool)
        .record_count(
            &manager.actor(),
            &RecordCountInput {
                inventory_id: item.item.id,
                theoretical_stock: Some(50),
                actual_stock: 42,
                status: StocktakingStatus::Completed,
                memo: Some("monthly count".to_owned()),
            },
        )
        .await
        .unwrap();
    assert_eq!(count.difference, -8);
    assert_eq!(count.discrepancy, DiscrepancyKind::Shortage);
    assert_eq!(count.factory_id, factory.id);
    assert_eq!(count.account_id, manager.id);

    let after = InventoryService::new(&ctx.pool)
        .get(&manager.actor(), &item.item.item_code)
        .await
        .unwrap();
    assert_eq!(after.item.stock_quantity, 50);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_theoretical_stock_defaults_to_current() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let item = ctx.item(factory.id, 30).await;
    let counts = StocktakingService::new(&ctx.pool);

    let count = counts
        .record_count(
            &ctx.ops(),
            &RecordCountInput {
                inventory_id: item.item.id,
                theoretical_stock: None,
                actual_stock: 31,
                status: StocktakingStatus::InProgress,
                memo: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(count.theoretical_stock, 30);
    assert_eq!(count.difference, 1);
    assert_eq!(count.discrepancy, DiscrepancyKind::Surplus);
    assert_eq!(count.status, StocktakingStatus::InProgress);

    let listed = counts
        .list(
            &ctx.ops(),
            &StocktakingFilter {
                inventory_id: Some(item.item.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, count.id);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_counts_need_stocktaking_permission() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let item = ctx.item(factory.id, 10).await;
    let clerk = ctx.account("clerk").await;
    ctx.assign(
        &clerk,
        factory.id,
        ManagerRole::Assistant,
        PermissionSet {
            inventory: true,
            ..PermissionSet::default()
        },
    )
    .await;

    let input = RecordCountInput {
        inventory_id: item.item.id,
        theoretical_stock: None,
        actual_stock: 10,
        status: StocktakingStatus::Completed,
        memo: None,
    };
    let err = StocktakingService::new(&ctx.pool)
        .record_count(&clerk.actor(), &input)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));

    let negative = RecordCountInput {
        actual_stock: -1,
        ..input
    };
    let err = StocktakingService::new(&ctx.pool)
        .record_count(&ctx.ops(), &negative)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}
