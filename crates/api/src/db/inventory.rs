//! Inventory item repository.
//!
//! `stock_quantity` is written only by [`set_stock`], which the ledger
//! service calls while holding the row lock taken by [`lock_by_id`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use factory_inventory_core::{
    AreaName, Cell, CoordinateId, FactoryId, FactoryScope, GridRef, InventoryId, StorageAreaId,
    StorageLocation, UnitPrice,
};

use super::scope::push_factory_filter;
use super::{RepositoryError, page_limit, page_offset};
use crate::models::{Inventory, InventoryFilter};

const INVENTORY_SELECT: &str = "\
    SELECT i.id, i.item_code, i.product_name, i.standard, i.category, i.stock_quantity, \
           i.lowest_stock, i.unit, i.unit_price, i.supplier, i.storing_place, i.memo, \
           i.factory_id, i.created_at, i.updated_at, \
           c.id AS coordinate_id, c.x AS coordinate_x, c.y AS coordinate_y, \
           s.id AS storage_area_id, s.area_name \
    FROM stock.inventory i \
    LEFT JOIN stock.coordinate c ON c.id = i.coordinate_id \
    LEFT JOIN stock.storage_area s ON s.id = c.storage_area_id";

#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: i32,
    item_code: String,
    product_name: String,
    standard: Option<String>,
    category: String,
    stock_quantity: i32,
    lowest_stock: i32,
    unit: String,
    unit_price: Decimal,
    supplier: Option<String>,
    storing_place: Option<String>,
    memo: Option<String>,
    factory_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    coordinate_id: Option<i32>,
    coordinate_x: Option<i32>,
    coordinate_y: Option<i32>,
    storage_area_id: Option<i32>,
    area_name: Option<String>,
}

impl InventoryRow {
    fn grid_ref(&self) -> Result<Option<GridRef>, RepositoryError> {
        let (Some(coordinate_id), Some(x), Some(y), Some(area_id), Some(area_name)) = (
            self.coordinate_id,
            self.coordinate_x,
            self.coordinate_y,
            self.storage_area_id,
            self.area_name.as_deref(),
        ) else {
            return Ok(None);
        };

        let area_name = AreaName::parse(area_name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid area name in database: {e}"))
        })?;

        Ok(Some(GridRef {
            coordinate_id: CoordinateId::new(coordinate_id),
            storage_area_id: StorageAreaId::new(area_id),
            area_name,
            cell: Cell::new(x, y),
        }))
    }
}

impl TryFrom<InventoryRow> for Inventory {
    type Error = RepositoryError;

    fn try_from(row: InventoryRow) -> Result<Self, Self::Error> {
        let location = StorageLocation::resolve(row.grid_ref()?, row.storing_place.as_deref());
        let unit_price = UnitPrice::new(row.unit_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid unit price in database: {e}"))
        })?;

        Ok(Self {
            id: InventoryId::new(row.id),
            item_code: row.item_code,
            product_name: row.product_name,
            standard: row.standard,
            category: row.category,
            stock_quantity: row.stock_quantity,
            lowest_stock: row.lowest_stock,
            unit: row.unit,
            unit_price,
            supplier: row.supplier,
            location,
            memo: row.memo,
            factory_id: FactoryId::new(row.factory_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// The fields a ledger transaction needs from a locked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct LockedItem {
    pub id: InventoryId,
    pub factory_id: FactoryId,
    pub stock_quantity: i32,
}

/// Validated column values for a new item.
#[derive(Debug, Clone)]
pub struct NewInventory<'a> {
    pub item_code: &'a str,
    pub product_name: &'a str,
    pub standard: Option<&'a str>,
    pub category: &'a str,
    pub stock_quantity: i32,
    pub lowest_stock: i32,
    pub unit: &'a str,
    pub unit_price: UnitPrice,
    pub supplier: Option<&'a str>,
    pub coordinate_id: Option<CoordinateId>,
    pub storing_place: Option<&'a str>,
    pub memo: Option<&'a str>,
    pub factory_id: FactoryId,
}

/// Validated partial update. `location` replaces both location columns.
///
/// For the optional text columns, `Some(None)` clears the column and `None`
/// leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct InventoryPatch<'a> {
    pub product_name: Option<&'a str>,
    pub standard: Option<Option<&'a str>>,
    pub category: Option<&'a str>,
    pub lowest_stock: Option<i32>,
    pub unit: Option<&'a str>,
    pub unit_price: Option<UnitPrice>,
    pub supplier: Option<Option<&'a str>>,
    pub location: Option<(Option<CoordinateId>, Option<&'a str>)>,
    pub memo: Option<Option<&'a str>>,
}

/// Repository for inventory reads.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List items within `scope`, ordered by item code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(
        &self,
        scope: &FactoryScope,
        filter: &InventoryFilter,
    ) -> Result<Vec<Inventory>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new(INVENTORY_SELECT);
        qb.push(" WHERE TRUE");
        push_factory_filter(&mut qb, "i.factory_id", scope);
        if let Some(factory_id) = filter.factory_id {
            qb.push(" AND i.factory_id = ").push_bind(factory_id);
        }
        if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            qb.push(" AND i.category = ").push_bind(category.to_owned());
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(search));
            qb.push(" AND (i.item_code ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR i.product_name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if filter.low_stock_only {
            qb.push(" AND i.stock_quantity <= i.lowest_stock");
        }
        qb.push(" ORDER BY i.item_code LIMIT ")
            .push_bind(page_limit(filter.limit))
            .push(" OFFSET ")
            .push_bind(page_offset(filter.offset));

        let rows = qb.build_query_as::<InventoryRow>().fetch_all(self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an item by its code, regardless of scope.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_code(&self, item_code: &str) -> Result<Option<Inventory>, RepositoryError> {
        let sql = format!("{INVENTORY_SELECT} WHERE i.item_code = $1");
        let row = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(item_code)
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }
}

/// Escape `LIKE` wildcards in user input.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Read an item inside a transaction, with its location joined.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
/// Returns `RepositoryError::DataCorruption` if the data is invalid.
pub async fn fetch(
    conn: &mut PgConnection,
    id: InventoryId,
) -> Result<Inventory, RepositoryError> {
    let sql = format!("{INVENTORY_SELECT} WHERE i.id = $1");
    let row = sqlx::query_as::<_, InventoryRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    row.try_into()
}

/// Lock an item row for the rest of the transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Contention` if the lock times out.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn lock_by_id(
    conn: &mut PgConnection,
    id: InventoryId,
) -> Result<Option<LockedItem>, RepositoryError> {
    let row = sqlx::query_as::<_, LockedItem>(
        "SELECT id, factory_id, stock_quantity FROM stock.inventory WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Lock an item row by code for the rest of the transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Contention` if the lock times out.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn lock_by_code(
    conn: &mut PgConnection,
    item_code: &str,
) -> Result<Option<LockedItem>, RepositoryError> {
    let row = sqlx::query_as::<_, LockedItem>(
        "SELECT id, factory_id, stock_quantity FROM stock.inventory \
         WHERE item_code = $1 FOR UPDATE",
    )
    .bind(item_code)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Insert an item and return its id.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the item code is taken.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert(
    conn: &mut PgConnection,
    item: &NewInventory<'_>,
) -> Result<InventoryId, RepositoryError> {
    let id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO stock.inventory (
            item_code, product_name, standard, category, stock_quantity, lowest_stock,
            unit, unit_price, supplier, coordinate_id, storing_place, memo, factory_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING id
        ",
    )
    .bind(item.item_code)
    .bind(item.product_name)
    .bind(item.standard)
    .bind(item.category)
    .bind(item.stock_quantity)
    .bind(item.lowest_stock)
    .bind(item.unit)
    .bind(item.unit_price.amount())
    .bind(item.supplier)
    .bind(item.coordinate_id)
    .bind(item.storing_place)
    .bind(item.memo)
    .bind(item.factory_id)
    .fetch_one(conn)
    .await?;

    Ok(InventoryId::new(id))
}

/// Apply a partial update. Never touches `stock_quantity`.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the item doesn't exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update(
    conn: &mut PgConnection,
    id: InventoryId,
    patch: &InventoryPatch<'_>,
) -> Result<(), RepositoryError> {
    let (set_location, coordinate_id, storing_place) = match patch.location {
        Some((coordinate_id, storing_place)) => (true, coordinate_id, storing_place),
        None => (false, None, None),
    };

    let result = sqlx::query(
        r"
        UPDATE stock.inventory
        SET
            product_name = COALESCE($2, product_name),
            standard = CASE WHEN $3 THEN $4 ELSE standard END,
            category = COALESCE($5, category),
            lowest_stock = COALESCE($6, lowest_stock),
            unit = COALESCE($7, unit),
            unit_price = COALESCE($8, unit_price),
            supplier = CASE WHEN $9 THEN $10 ELSE supplier END,
            memo = CASE WHEN $11 THEN $12 ELSE memo END,
            coordinate_id = CASE WHEN $13 THEN $14 ELSE coordinate_id END,
            storing_place = CASE WHEN $13 THEN $15 ELSE storing_place END
        WHERE id = $1
        ",
    )
    .bind(id)
    .bind(patch.product_name)
    .bind(patch.standard.is_some())
    .bind(patch.standard.flatten())
    .bind(patch.category)
    .bind(patch.lowest_stock)
    .bind(patch.unit)
    .bind(patch.unit_price.map(|p| p.amount()))
    .bind(patch.supplier.is_some())
    .bind(patch.supplier.flatten())
    .bind(patch.memo.is_some())
    .bind(patch.memo.flatten())
    .bind(set_location)
    .bind(coordinate_id)
    .bind(storing_place)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Overwrite the stock quantity of a locked item.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the item doesn't exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn set_stock(
    conn: &mut PgConnection,
    id: InventoryId,
    stock_quantity: i32,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE stock.inventory SET stock_quantity = $2 WHERE id = $1")
        .bind(id)
        .bind(stock_quantity)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Delete an item.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if ledger or stocktaking rows
/// reference the item.
/// Returns `RepositoryError::NotFound` if the item doesn't exist.
pub async fn delete(conn: &mut PgConnection, id: InventoryId) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM stock.inventory WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row() -> InventoryRow {
        InventoryRow {
            id: 1,
            item_code: "PROD-001".into(),
            product_name: "Bolt".into(),
            standard: None,
            category: "Parts".into(),
            stock_quantity: 100,
            lowest_stock: 10,
            unit: "pcs".into(),
            unit_price: Decimal::new(150, 2),
            supplier: None,
            storing_place: Some("Shelf 4".into()),
            memo: None,
            factory_id: 7,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            coordinate_id: None,
            coordinate_x: None,
            coordinate_y: None,
            storage_area_id: None,
            area_name: None,
        }
    }

    #[test]
    fn test_legacy_location_without_coordinate() {
        let item = Inventory::try_from(row()).unwrap();
        assert_eq!(item.location_name().as_deref(), Some("Shelf 4"));
    }

    #[test]
    fn test_grid_location_wins() {
        let mut r = row();
        r.coordinate_id = Some(9);
        r.coordinate_x = Some(2);
        r.coordinate_y = Some(3);
        r.storage_area_id = Some(4);
        r.area_name = Some("B".into());

        let item = Inventory::try_from(r).unwrap();
        assert_eq!(item.location_name().as_deref(), Some("B-2-3"));
        assert_eq!(
            item.location.and_then(|l| l.coordinate_id()),
            Some(CoordinateId::new(9))
        );
    }

    #[test]
    fn test_corrupt_area_name() {
        let mut r = row();
        r.coordinate_id = Some(9);
        r.coordinate_x = Some(1);
        r.coordinate_y = Some(1);
        r.storage_area_id = Some(4);
        r.area_name = Some("AB".into());

        assert!(matches!(
            Inventory::try_from(r),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("bolt"), "bolt");
    }
}
