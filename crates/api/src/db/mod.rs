//! Database operations for the inventory `PostgreSQL` store.
//!
//! # Schema: `stock`
//!
//! ## Tables
//!
//! - `account` - Authenticated principals (created via the CLI)
//! - `factory` - Tenants
//! - `manager` - Account ↔ factory assignment with role and permission flags
//! - `storage_area` / `coordinate` - Lettered grids and their cells
//! - `inventory` - Items and their running stock quantity
//! - `stock_movement` - Append-only stock ledger
//! - `stocktaking` - Physical count records
//! - `selection_option` - Category, supplier and unit master values
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p factory-inventory-cli -- migrate
//! ```

pub mod accounts;
pub mod factories;
pub mod inventory;
pub mod managers;
pub mod scope;
pub mod selection_options;
pub mod stock_movements;
pub mod stocktakings;
pub mod storage_areas;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

pub use accounts::AccountRepository;
pub use factories::FactoryRepository;
pub use inventory::InventoryRepository;
pub use managers::ManagerRepository;
pub use selection_options::SelectionOptionRepository;
pub use stock_movements::StockMovementRepository;
pub use stocktakings::StocktakingRepository;
pub use storage_areas::StorageAreaRepository;

/// How long a transaction waits for a row lock before giving up.
pub const LOCK_TIMEOUT: &str = "5s";

/// Default page size for list queries.
pub const DEFAULT_LIMIT: i64 = 100;
/// Largest accepted page size.
pub const MAX_LIMIT: i64 = 500;

/// SQLSTATE codes that mean "lost a race, retry".
const CONTENTION_CODES: &[&str] = &[
    "40001", // serialization_failure
    "40P01", // deadlock_detected
    "55P03", // lock_not_available
];

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (unique, check or restricting foreign key).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Lock timeout, deadlock or serialization failure.
    #[error("concurrent update in progress, retry")]
    Contention,
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err
                .code()
                .is_some_and(|code| CONTENTION_CODES.contains(&code.as_ref()))
            {
                return Self::Contention;
            }
            if matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation | ErrorKind::CheckViolation | ErrorKind::ForeignKeyViolation
            ) {
                return Self::Conflict(constraint_message(db_err.constraint()));
            }
        }
        Self::Database(e)
    }
}

/// Human-readable message for a violated constraint.
fn constraint_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("account_pkey") => "account already exists".to_owned(),
        Some("manager_account_factory_key") => {
            "account already has a manager assignment for this factory".to_owned()
        }
        Some("storage_area_factory_name_key") => {
            "storage area name already used in this factory".to_owned()
        }
        Some("coordinate_area_xy_key") => {
            "coordinate already exists in this storage area".to_owned()
        }
        Some("inventory_item_code_key") => "item code already exists".to_owned(),
        Some("inventory_single_location") => {
            "item cannot have both a coordinate and a storing place".to_owned()
        }
        Some("stock_movement_inventory_id_fkey" | "stocktaking_inventory_id_fkey") => {
            "item has stock history and cannot be deleted".to_owned()
        }
        Some("manager_account_id_fkey") => "account does not exist".to_owned(),
        Some(
            "manager_factory_id_fkey" | "storage_area_factory_id_fkey" | "inventory_factory_id_fkey",
        ) => "factory does not exist".to_owned(),
        Some("inventory_coordinate_id_fkey") => "coordinate does not exist".to_owned(),
        Some("selection_option_type_value_key") => "option already exists".to_owned(),
        Some(other) => format!("constraint {other} violated"),
        None => "constraint violated".to_owned(),
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2.min(max_connections))
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Begin a transaction that will take row locks.
///
/// Sets a transaction-local `lock_timeout` so a contended lock surfaces as
/// [`RepositoryError::Contention`] instead of waiting indefinitely.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the transaction cannot be started.
pub async fn begin_locking(pool: &PgPool) -> Result<Transaction<'static, Postgres>, RepositoryError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT set_config('lock_timeout', $1, true)")
        .bind(LOCK_TIMEOUT)
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Clamp a requested page size into `1..=MAX_LIMIT`.
#[must_use]
pub fn page_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Non-negative page offset.
#[must_use]
pub fn page_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_messages() {
        assert_eq!(
            constraint_message(Some("inventory_item_code_key")),
            "item code already exists"
        );
        assert_eq!(
            constraint_message(Some("stocktaking_inventory_id_fkey")),
            "item has stock history and cannot be deleted"
        );
        assert_eq!(
            constraint_message(Some("mystery")),
            "constraint mystery violated"
        );
        assert_eq!(constraint_message(None), "constraint violated");
    }

    #[test]
    fn test_non_database_error_is_database() {
        let err = RepositoryError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Database(_)));
    }

    #[test]
    fn test_paging() {
        assert_eq!(page_limit(None), DEFAULT_LIMIT);
        assert_eq!(page_limit(Some(0)), 1);
        assert_eq!(page_limit(Some(10_000)), MAX_LIMIT);
        assert_eq!(page_offset(Some(-5)), 0);
        assert_eq!(page_offset(Some(20)), 20);
    }
}
