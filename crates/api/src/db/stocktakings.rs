//! Stocktaking repository.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use factory_inventory_core::{
    AccountId, Discrepancy, FactoryId, FactoryScope, InventoryId, StocktakingId,
    StocktakingStatus,
};

use super::scope::push_factory_filter;
use super::{RepositoryError, page_limit, page_offset};
use crate::models::{Stocktaking, StocktakingFilter};

const STOCKTAKING_COLUMNS: &str = "\
    t.id, t.inventory_id, i.item_code, i.factory_id, t.theoretical_stock, t.actual_stock, \
    t.difference, t.account_id, t.status, t.memo, t.created_at";

#[derive(Debug, sqlx::FromRow)]
struct StocktakingRow {
    id: i32,
    inventory_id: i32,
    item_code: String,
    factory_id: i32,
    theoretical_stock: i32,
    actual_stock: i32,
    difference: i32,
    account_id: String,
    status: StocktakingStatus,
    memo: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<StocktakingRow> for Stocktaking {
    type Error = RepositoryError;

    fn try_from(row: StocktakingRow) -> Result<Self, Self::Error> {
        let account_id = AccountId::parse(&row.account_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid account id in database: {e}"))
        })?;
        let discrepancy = Discrepancy::between(row.theoretical_stock, row.actual_stock)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid count in database: {e}")))?;
        if discrepancy.difference != row.difference {
            return Err(RepositoryError::DataCorruption(format!(
                "stocktaking {} stores difference {} but counts imply {}",
                row.id, row.difference, discrepancy.difference
            )));
        }

        Ok(Self {
            id: StocktakingId::new(row.id),
            inventory_id: InventoryId::new(row.inventory_id),
            item_code: row.item_code,
            factory_id: FactoryId::new(row.factory_id),
            theoretical_stock: discrepancy.theoretical_stock,
            actual_stock: discrepancy.actual_stock,
            difference: discrepancy.difference,
            discrepancy: discrepancy.kind(),
            account_id,
            status: row.status,
            memo: row.memo,
            created_at: row.created_at,
        })
    }
}

/// A count about to be written.
#[derive(Debug, Clone, Copy)]
pub struct NewStocktaking<'a> {
    pub inventory_id: InventoryId,
    pub discrepancy: Discrepancy,
    pub account_id: &'a AccountId,
    pub status: StocktakingStatus,
    pub memo: Option<&'a str>,
}

/// Repository for stocktaking reads.
pub struct StocktakingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StocktakingRepository<'a> {
    /// Create a new stocktaking repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List counts within `scope`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(
        &self,
        scope: &FactoryScope,
        filter: &StocktakingFilter,
    ) -> Result<Vec<Stocktaking>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(STOCKTAKING_COLUMNS).push(
            " FROM stock.stocktaking t \
             JOIN stock.inventory i ON i.id = t.inventory_id \
             WHERE TRUE",
        );
        push_factory_filter(&mut qb, "i.factory_id", scope);
        if let Some(inventory_id) = filter.inventory_id {
            qb.push(" AND t.inventory_id = ").push_bind(inventory_id);
        }
        if let Some(factory_id) = filter.factory_id {
            qb.push(" AND i.factory_id = ").push_bind(factory_id);
        }
        qb.push(" ORDER BY t.created_at DESC, t.id DESC LIMIT ")
            .push_bind(page_limit(filter.limit))
            .push(" OFFSET ")
            .push_bind(page_offset(filter.offset));

        let rows = qb
            .build_query_as::<StocktakingRow>()
            .fetch_all(self.pool)
            .await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }
}

/// Insert a count record.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut PgConnection,
    count: &NewStocktaking<'_>,
) -> Result<Stocktaking, RepositoryError> {
    let sql = format!(
        r"
        WITH t AS (
            INSERT INTO stock.stocktaking (
                inventory_id, theoretical_stock, actual_stock, difference, account_id, status, memo
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
        )
        SELECT {STOCKTAKING_COLUMNS}
        FROM t
        JOIN stock.inventory i ON i.id = t.inventory_id
        "
    );
    let row = sqlx::query_as::<_, StocktakingRow>(&sql)
        .bind(count.inventory_id)
        .bind(count.discrepancy.theoretical_stock)
        .bind(count.discrepancy.actual_stock)
        .bind(count.discrepancy.difference)
        .bind(count.account_id.as_str())
        .bind(count.status)
        .bind(count.memo)
        .fetch_one(conn)
        .await?;

    row.try_into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use factory_inventory_core::DiscrepancyKind;

    use super::*;

    fn row(theoretical: i32, actual: i32, difference: i32) -> StocktakingRow {
        StocktakingRow {
            id: 1,
            inventory_id: 2,
            item_code: "PROD-001".into(),
            factory_id: 3,
            theoretical_stock: theoretical,
            actual_stock: actual,
            difference,
            account_id: "counter".into(),
            status: StocktakingStatus::Completed,
            memo: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_classification() {
        let count = Stocktaking::try_from(row(50, 42, -8)).unwrap();
        assert_eq!(count.difference, -8);
        assert_eq!(count.discrepancy, DiscrepancyKind::Shortage);
    }

    #[test]
    fn test_inconsistent_difference_is_corruption() {
        assert!(matches!(
            Stocktaking::try_from(row(50, 42, 8)),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
