//! Access scope tests: which factories an account sees and may change.

#![allow(clippy::unwrap_used)]

use factory_inventory_api::models::{CreateInventoryInput, InventoryFilter};
use factory_inventory_api::services::{
    AccessService, FactoryService, InventoryService, ManagerService, ServiceError,
};
use factory_inventory_core::{FactoryId, ManagerRole, PermissionSet};
use factory_inventory_integration_tests::{TestContext, unique};

fn factory_ids(summaries: &[factory_inventory_api::models::FactorySummary]) -> Vec<FactoryId> {
    summaries.iter().map(|f| f.factory.id).collect()
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_superuser_sees_every_factory() {
    let ctx = TestContext::new().await;
    let first = ctx.factory().await;
    let second = ctx.factory().await;
    let root = ctx.superuser("root").await;

    let visible = factory_ids(&FactoryService::new(&ctx.pool).list(&root.actor()).await.unwrap());
    assert!(visible.contains(&first.id));
    assert!(visible.contains(&second.id));

    let access = AccessService::new(&ctx.pool);
    assert!(access.resolve_scope(&root.actor()).await.unwrap().is_unrestricted());
    assert!(!access.is_factory_manager(&root.actor(), first.id).await.unwrap());
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_manager_sees_only_assigned_factories() {
    let ctx = TestContext::new().await;
    let mine = ctx.factory().await;
    let theirs = ctx.factory().await;
    let manager = ctx.primary_manager(mine.id).await;
    let own_item = ctx.item(mine.id, 5).await;
    let foreign_item = ctx.item(theirs.id, 5).await;

    let factories = FactoryService::new(&ctx.pool);
    let visible = factory_ids(&factories.list(&manager.actor()).await.unwrap());
    assert_eq!(visible, vec![mine.id]);

    let err = factories.get(&manager.actor(), theirs.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let items = InventoryService::new(&ctx.pool);
    let listed = items
        .list(&manager.actor(), &InventoryFilter::default())
        .await
        .unwrap();
    assert!(listed.iter().any(|i| i.item.id == own_item.item.id));
    assert!(listed.iter().all(|i| i.item.factory_id == mine.id));

    let err = items
        .get(&manager.actor(), &foreign_item.item.item_code)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    // Filtering by a foreign factory narrows to nothing rather than leaking
    let filtered = items
        .list(
            &manager.actor(),
            &InventoryFilter {
                factory_id: Some(theirs.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(filtered.is_empty());
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_deactivated_assignment_grants_nothing() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let account = ctx.account("former").await;
    let assignment = ctx
        .assign(&account, factory.id, ManagerRole::Primary, PermissionSet::all())
        .await;
    let item = ctx.item(factory.id, 5).await;

    ManagerService::new(&ctx.pool)
        .deactivate(&ctx.ops(), assignment.id)
        .await
        .unwrap();

    let visible = FactoryService::new(&ctx.pool)
        .list(&account.actor())
        .await
        .unwrap();
    assert!(visible.is_empty());

    let err = InventoryService::new(&ctx.pool)
        .get(&account.actor(), &item.item.item_code)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let me = AccessService::new(&ctx.pool).me(account).await.unwrap();
    assert!(me.managed_factories.is_empty());
    assert!(!me.unrestricted);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_permissions_gate_writes_not_reads() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let viewer = ctx.account("viewer").await;
    ctx.assign(
        &viewer,
        factory.id,
        ManagerRole::Supervisor,
        PermissionSet {
            reports: true,
            ..PermissionSet::default()
        },
    )
    .await;
    let item = ctx.item(factory.id, 5).await;
    let items = InventoryService::new(&ctx.pool);

    let seen = items
        .get(&viewer.actor(), &item.item.item_code)
        .await
        .unwrap();
    assert_eq!(seen.item.id, item.item.id);

    let err = items
        .create(
            &viewer.actor(),
            &CreateInventoryInput {
                item_code: unique("DENIED"),
                product_name: "Washer".to_owned(),
                standard: None,
                category: "Consumables".to_owned(),
                stock_quantity: 0,
                lowest_stock: 0,
                unit: "pcs".to_owned(),
                unit_price: rust_decimal::Decimal::ZERO,
                supplier: None,
                location: None,
                memo: None,
                factory_id: factory.id,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));

    let me = AccessService::new(&ctx.pool).me(viewer).await.unwrap();
    assert_eq!(me.managed_factories.len(), 1);
    assert_eq!(me.managed_factories[0].role, ManagerRole::Supervisor);
    assert!(me.managed_factories[0].permissions.reports);
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_only_superuser_creates_factories() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let manager = ctx.primary_manager(factory.id).await;

    let err = FactoryService::new(&ctx.pool)
        .create(
            &manager.actor(),
            &factory_inventory_api::models::CreateFactoryInput {
                name: unique("rogue"),
                address: String::new(),
                phone: String::new(),
                status: factory_inventory_core::FactoryStatus::Active,
                capacity: 0,
                memo: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));
}
