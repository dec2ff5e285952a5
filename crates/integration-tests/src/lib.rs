//! Integration test support for the factory inventory service.
//!
//! # Running Tests
//!
//! The suites run against a real `PostgreSQL` and are `#[ignore]`d by
//! default:
//!
//! ```bash
//! export TEST_DATABASE_URL=postgres://localhost/factory_inventory_test
//! cargo test -p factory-inventory-integration-tests -- --ignored
//! ```
//!
//! Every fixture gets a unique name, so suites can share one database and
//! run in parallel without cleanup.

#![allow(clippy::missing_panics_doc)]

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use factory_inventory_api::db::AccountRepository;
use factory_inventory_api::models::{
    Account, AssignManagerInput, CreateAccountInput, CreateFactoryInput, CreateInventoryInput,
    CreateStorageAreaInput, Factory, InventoryView, Manager, StorageAreaDetail,
};
use factory_inventory_api::services::{
    FactoryService, InventoryService, ManagerService, StorageService,
};
use factory_inventory_core::{
    AccountId, Actor, FactoryId, FactoryStatus, ManagerRole, PermissionSet,
};

/// Shared handle for one test: a migrated pool plus a superuser that
/// creates fixtures.
pub struct TestContext {
    pub pool: PgPool,
    pub operator: Account,
}

impl TestContext {
    /// Connect to `TEST_DATABASE_URL` and apply migrations.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("../api/migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let operator = create_account(&pool, "operator", false, true).await;
        Self { pool, operator }
    }

    /// The fixture superuser as an actor.
    #[must_use]
    pub fn ops(&self) -> Actor {
        self.operator.actor()
    }

    /// A plain account with no assignments.
    pub async fn account(&self, label: &str) -> Account {
        create_account(&self.pool, label, false, false).await
    }

    /// A staff account with no assignments.
    pub async fn staff(&self, label: &str) -> Account {
        create_account(&self.pool, label, true, false).await
    }

    pub async fn superuser(&self, label: &str) -> Account {
        create_account(&self.pool, label, false, true).await
    }

    pub async fn factory(&self) -> Factory {
        FactoryService::new(&self.pool)
            .create(
                &self.ops(),
                &CreateFactoryInput {
                    name: unique("factory"),
                    address: "1 Test Street".to_owned(),
                    phone: String::new(),
                    status: FactoryStatus::Active,
                    capacity: 1000,
                    memo: None,
                },
            )
            .await
            .expect("Failed to create factory")
    }

    /// Assign `account` to `factory_id`.
    pub async fn assign(
        &self,
        account: &Account,
        factory_id: FactoryId,
        role: ManagerRole,
        permissions: PermissionSet,
    ) -> Manager {
        ManagerService::new(&self.pool)
            .assign(
                &self.ops(),
                &AssignManagerInput {
                    account_id: account.id.to_string(),
                    factory_id,
                    role,
                    permissions,
                    memo: None,
                },
            )
            .await
            .expect("Failed to assign manager")
    }

    /// A new account holding the primary role on `factory_id`.
    pub async fn primary_manager(&self, factory_id: FactoryId) -> Account {
        let account = self.account("primary").await;
        self.assign(&account, factory_id, ManagerRole::Primary, PermissionSet::all())
            .await;
        account
    }

    /// An item with `stock` units booked as its opening balance.
    pub async fn item(&self, factory_id: FactoryId, stock: i32) -> InventoryView {
        InventoryService::new(&self.pool)
            .create(
                &self.ops(),
                &CreateInventoryInput {
                    item_code: unique("ITEM"),
                    product_name: "Hex bolt M8".to_owned(),
                    standard: Some("M8x40".to_owned()),
                    category: "Consumables".to_owned(),
                    stock_quantity: stock,
                    lowest_stock: 10,
                    unit: "pcs".to_owned(),
                    unit_price: Decimal::new(125, 2),
                    supplier: None,
                    location: None,
                    memo: None,
                    factory_id,
                },
            )
            .await
            .expect("Failed to create inventory item")
    }

    pub async fn area(
        &self,
        factory_id: FactoryId,
        area_name: &str,
        width: i32,
        height: i32,
    ) -> StorageAreaDetail {
        StorageService::new(&self.pool)
            .create(
                &self.ops(),
                &CreateStorageAreaInput {
                    factory_id,
                    area_name: area_name.to_owned(),
                    width,
                    height,
                    description: None,
                },
            )
            .await
            .expect("Failed to create storage area")
    }
}

/// `prefix` plus a random suffix.
#[must_use]
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

async fn create_account(pool: &PgPool, label: &str, is_staff: bool, is_superuser: bool) -> Account {
    let id = unique(label);
    AccountRepository::new(pool)
        .create(&CreateAccountInput {
            id: AccountId::parse(&id).expect("generated account id is valid"),
            email: format!("{id}@example.test"),
            is_staff,
            is_superuser,
        })
        .await
        .expect("Failed to create account")
}
