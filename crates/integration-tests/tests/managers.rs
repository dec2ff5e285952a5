//! Manager assignment tests.

#![allow(clippy::unwrap_used)]

use factory_inventory_api::models::{AssignManagerInput, ManagerFilter, UpdateManagerInput};
use factory_inventory_api::services::{ManagerService, ServiceError};
use factory_inventory_core::{ManagerRole, PermissionSet, RecordStatus};
use factory_inventory_integration_tests::TestContext;

fn assignment(account_id: &str, factory_id: factory_inventory_core::FactoryId) -> AssignManagerInput {
    AssignManagerInput {
        account_id: account_id.to_owned(),
        factory_id,
        role: ManagerRole::Assistant,
        permissions: PermissionSet {
            inventory: true,
            ..PermissionSet::default()
        },
        memo: None,
    }
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_duplicate_assignment_is_rejected() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let account = ctx.account("dup").await;
    let managers = ManagerService::new(&ctx.pool);
    let input = assignment(account.id.as_str(), factory.id);

    managers.assign(&ctx.ops(), &input).await.unwrap();
    let err = managers.assign(&ctx.ops(), &input).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_primary_manages_own_factory_only() {
    let ctx = TestContext::new().await;
    let mine = ctx.factory().await;
    let theirs = ctx.factory().await;
    let primary = ctx.primary_manager(mine.id).await;
    let recruit = ctx.account("recruit").await;
    let managers = ManagerService::new(&ctx.pool);

    let created = managers
        .assign(&primary.actor(), &assignment(recruit.id.as_str(), mine.id))
        .await
        .unwrap();
    assert_eq!(created.role, ManagerRole::Assistant);
    assert_eq!(created.status, RecordStatus::Active);

    let err = managers
        .assign(&primary.actor(), &assignment(recruit.id.as_str(), theirs.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    // Assistants cannot administer other managers
    let err = managers
        .update(
            &recruit.actor(),
            created.id,
            &UpdateManagerInput {
                role: Some(ManagerRole::Primary),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_unknown_account_is_rejected() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;

    let err = ManagerService::new(&ctx.pool)
        .assign(&ctx.ops(), &assignment("nobody-registered-this", factory.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
#[ignore = "Requires TEST_DATABASE_URL"]
async fn test_deactivate_is_idempotent_and_hidden_by_default() {
    let ctx = TestContext::new().await;
    let factory = ctx.factory().await;
    let account = ctx.account("leaver").await;
    let managers = ManagerService::new(&ctx.pool);
    let manager = managers
        .assign(&ctx.ops(), &assignment(account.id.as_str(), factory.id))
        .await
        .unwrap();

    let first = managers.deactivate(&ctx.ops(), manager.id).await.unwrap();
    let second = managers.deactivate(&ctx.ops(), manager.id).await.unwrap();
    assert_eq!(first.status, RecordStatus::Deactivated);
    assert_eq!(second.status, RecordStatus::Deactivated);

    let active = managers
        .list(
            &ctx.ops(),
            &ManagerFilter {
                factory_id: Some(factory.id),
                include_deactivated: false,
            },
        )
        .await
        .unwrap();
    assert!(active.iter().all(|m| m.id != manager.id));

    let all = managers
        .list(
            &ctx.ops(),
            &ManagerFilter {
                factory_id: Some(factory.id),
                include_deactivated: true,
            },
        )
        .await
        .unwrap();
    assert!(all.iter().any(|m| m.id == manager.id));

    // Reactivation goes through update
    let back = managers
        .update(
            &ctx.ops(),
            manager.id,
            &UpdateManagerInput {
                status: Some(RecordStatus::Active),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(back.status, RecordStatus::Active);
}
