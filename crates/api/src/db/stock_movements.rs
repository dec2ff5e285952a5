//! Stock ledger repository.
//!
//! Rows are inserted and read, never updated or deleted.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use factory_inventory_core::{
    AccountId, FactoryId, FactoryScope, InventoryId, MovementQuantity, MovementType,
    StockMovementId,
};

use super::scope::push_factory_filter;
use super::{RepositoryError, page_limit, page_offset};
use crate::models::{MovementFilter, StockMovement};

#[derive(Debug, sqlx::FromRow)]
struct StockMovementRow {
    id: i32,
    inventory_id: i32,
    item_code: String,
    movement_type: MovementType,
    quantity: i32,
    reason: Option<String>,
    account_id: String,
    factory_id: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<StockMovementRow> for StockMovement {
    type Error = RepositoryError;

    fn try_from(row: StockMovementRow) -> Result<Self, Self::Error> {
        let account_id = AccountId::parse(&row.account_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid account id in database: {e}"))
        })?;

        Ok(Self {
            id: StockMovementId::new(row.id),
            inventory_id: InventoryId::new(row.inventory_id),
            item_code: row.item_code,
            movement_type: row.movement_type,
            quantity: row.quantity,
            reason: row.reason,
            account_id,
            factory_id: FactoryId::new(row.factory_id),
            created_at: row.created_at,
        })
    }
}

/// A ledger entry about to be written.
#[derive(Debug, Clone, Copy)]
pub struct NewMovement<'a> {
    pub inventory_id: InventoryId,
    pub movement_type: MovementType,
    pub quantity: MovementQuantity,
    pub reason: Option<&'a str>,
    pub account_id: &'a AccountId,
    pub factory_id: FactoryId,
}

/// Repository for ledger reads.
pub struct StockMovementRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StockMovementRepository<'a> {
    /// Create a new stock movement repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List entries within `scope`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(
        &self,
        scope: &FactoryScope,
        filter: &MovementFilter,
    ) -> Result<Vec<StockMovement>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT m.id, m.inventory_id, i.item_code, m.movement_type, m.quantity, m.reason, \
                    m.account_id, m.factory_id, m.created_at \
             FROM stock.stock_movement m \
             JOIN stock.inventory i ON i.id = m.inventory_id \
             WHERE TRUE",
        );
        push_factory_filter(&mut qb, "m.factory_id", scope);
        if let Some(inventory_id) = filter.inventory_id {
            qb.push(" AND m.inventory_id = ").push_bind(inventory_id);
        }
        if let Some(factory_id) = filter.factory_id {
            qb.push(" AND m.factory_id = ").push_bind(factory_id);
        }
        if let Some(movement_type) = filter.movement_type {
            qb.push(" AND m.movement_type = ").push_bind(movement_type);
        }
        qb.push(" ORDER BY m.created_at DESC, m.id DESC LIMIT ")
            .push_bind(page_limit(filter.limit))
            .push(" OFFSET ")
            .push_bind(page_offset(filter.offset));

        let rows = qb
            .build_query_as::<StockMovementRow>()
            .fetch_all(self.pool)
            .await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }
}

/// Append a ledger entry.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut PgConnection,
    movement: &NewMovement<'_>,
) -> Result<StockMovement, RepositoryError> {
    let row = sqlx::query_as::<_, StockMovementRow>(
        r"
        WITH inserted AS (
            INSERT INTO stock.stock_movement (
                inventory_id, movement_type, quantity, reason, account_id, factory_id
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
        )
        SELECT m.id, m.inventory_id, i.item_code, m.movement_type, m.quantity, m.reason,
               m.account_id, m.factory_id, m.created_at
        FROM inserted m
        JOIN stock.inventory i ON i.id = m.inventory_id
        ",
    )
    .bind(movement.inventory_id)
    .bind(movement.movement_type)
    .bind(movement.quantity.get())
    .bind(movement.reason)
    .bind(movement.account_id.as_str())
    .bind(movement.factory_id)
    .fetch_one(conn)
    .await?;

    row.try_into()
}
