//! Stock ledger tests: movements, the non-negative invariant and row locking.

#![allow(clippy::unwrap_used)]

use factory_inventory_api::models::{CreateMovementInput, MovementFilter};
use factory_inventory_api::services::{InventoryService, LedgerService, ServiceError};
use factory_inventory_core::{ManagerRole, MovementQuantity, MovementType, PermissionSet, ledger};
use factory_inventory_integration_tests::TestContext;

/// Stock implied by the item's ledger, oldest entry first.
async fn replayed_stock(
    ctx: &TestContext,
    item: &factory_inventory_api::models::InventoryView,
) -> Option<i32> {
    let history = LedgerService::new(&ctx.pool)
        .list(
            &ctx.ops(),
            &MovementFilter {
                inventory_id: Some(item.item.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    ledger::replay(
        history
            .iter()
            .rev()
            .map(|m| (m.movement_type, MovementQuantity::new(m.quantity).unwrap())),
    )
}

fn movement(
    item: &factory_inventory_api::models::InventoryView,
    movement_type: MovementType,
    quantity: i32,
) -> CreateMovementInput {
    CreateMovementInput {
        inventory_id: item.item.id,
        factory_id: item.item.factory_id,
        movement_type,
        quantity,
        reason: Some("test".to_owned()),
    }
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_movements_update_stock() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let manager = ctx.primary_manager(factory.id).await;
    let item = ctx.item(factory.id, 100).await;
    let ledger = LedgerService::new(&ctx.pool);

    let receipt = ledger
        .apply_movement(&manager.actor(), &movement(&item, MovementType::In, 20))
        .await
        .unwrap();
    assert_eq!(receipt.stock_quantity, 120);
    assert_eq!(receipt.movement.account_id, manager.id);
    assert_eq!(receipt.movement.item_code, item.item.item_code);

    let receipt = ledger
        .apply_movement(&manager.actor(), &movement(&item, MovementType::Out, 50))
        .await
        .unwrap();
    assert_eq!(receipt.stock_quantity, 70);

    let history = ledger
        .list(
            &manager.actor(),
            &MovementFilter {
                inventory_id: Some(item.item.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    // opening balance + two movements, newest first
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].movement_type, MovementType::Out);
    assert_eq!(history[2].quantity, 100);
    assert_eq!(history[2].reason.as_deref(), Some("opening balance"));

    // The ledger alone explains the stored quantity
    assert_eq!(replayed_stock(&ctx, &item).await, Some(70));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_outbound_beyond_stock_is_rejected() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let item = ctx.item(factory.id, 100).await;

    let err = LedgerService::new(&ctx.pool)
        .apply_movement(&ctx.ops(), &movement(&item, MovementType::Out, 150))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InsufficientStock {
            available: 100,
            requested: 150
        }
    ));

    let after = InventoryService::new(&ctx.pool)
        .get(&ctx.ops(), &item.item.item_code)
        .await
        .unwrap();
    assert_eq!(after.item.stock_quantity, 100);

    let history = LedgerService::new(&ctx.pool)
        .list(
            &ctx.ops(),
            &MovementFilter {
                inventory_id: Some(item.item.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(history.len(), 1, "rejected movement must not be recorded");
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_concurrent_outbound_cannot_overdraw() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let item = ctx.item(factory.id, 100).await;
    let actor = ctx.ops();
    let input = movement(&item, MovementType::Out, 60);

    let first = LedgerService::new(&ctx.pool);
    let second = LedgerService::new(&ctx.pool);
    let (a, b) = tokio::join!(
        first.apply_movement(&actor, &input),
        second.apply_movement(&actor, &input),
    );

    let succeeded = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);
    let failure = if a.is_err() { a } else { b };
    assert!(matches!(
        failure,
        Err(ServiceError::InsufficientStock {
            available: 40,
            requested: 60
        })
    ));

    let after = InventoryService::new(&ctx.pool)
        .get(&actor, &item.item.item_code)
        .await
        .unwrap();
    assert_eq!(after.item.stock_quantity, 40);
    assert_eq!(replayed_stock(&ctx, &item).await, Some(40));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_movement_requires_inventory_permission() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let item = ctx.item(factory.id, 10).await;
    let counter = ctx.account("counter").await;
    ctx.assign(
        &counter,
        factory.id,
        ManagerRole::Assistant,
        PermissionSet {
            stocktaking: true,
            ..PermissionSet::default()
        },
    )
    .await;

    let err = LedgerService::new(&ctx.pool)
        .apply_movement(&counter.actor(), &movement(&item, MovementType::In, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_movement_validation() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let other = ctx.factory().await;
    let item = ctx.item(factory.id, 10).await;
    let ledger = LedgerService::new(&ctx.pool);

    let zero = ledger
        .apply_movement(&ctx.ops(), &movement(&item, MovementType::In, 0))
        .await
        .unwrap_err();
    assert!(matches!(zero, ServiceError::Validation(_)));

    let mut wrong_factory = movement(&item, MovementType::In, 5);
    wrong_factory.factory_id = other.id;
    let err = ledger
        .apply_movement(&ctx.ops(), &wrong_factory)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_out_of_scope_item_is_not_found() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let other = ctx.factory().await;
    let outsider = ctx.primary_manager(other.id).await;
    let item = ctx.item(factory.id, 10).await;

    let err = LedgerService::new(&ctx.pool)
        .apply_movement(&outsider.actor(), &movement(&item, MovementType::Out, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
