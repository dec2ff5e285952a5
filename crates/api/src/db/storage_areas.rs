//! Storage area and coordinate repository.
//!
//! Pool-level reads live on [`StorageAreaRepository`]. Grid mutations are
//! free functions over a `PgConnection` so the service can run them inside
//! one transaction holding the area's row lock.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use factory_inventory_core::{
    AreaName, Cell, CoordinateId, FactoryId, FactoryScope, GridSize, InventoryId, StorageAreaId,
};

use super::RepositoryError;
use super::scope::push_factory_filter;
use crate::models::{Coordinate, StorageArea, StorageAreaFilter};

const AREA_COLUMNS: &str =
    "s.id, s.factory_id, s.area_name, s.width, s.height, s.description, s.created_at, s.updated_at";

/// Distinct coordinates of `s` referenced by at least one item.
const OCCUPIED_SUBQUERY: &str = "(SELECT COUNT(DISTINCT i.coordinate_id) \
     FROM stock.inventory i \
     JOIN stock.coordinate c ON c.id = i.coordinate_id \
     WHERE c.storage_area_id = s.id) AS occupied_coordinates";

#[derive(Debug, sqlx::FromRow)]
struct StorageAreaRow {
    id: i32,
    factory_id: i32,
    area_name: String,
    width: i32,
    height: i32,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StorageAreaRow> for StorageArea {
    type Error = RepositoryError;

    fn try_from(row: StorageAreaRow) -> Result<Self, Self::Error> {
        let area_name = AreaName::parse(&row.area_name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid area name in database: {e}"))
        })?;
        let size = GridSize::new(row.width, row.height).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid grid size in database: {e}"))
        })?;

        Ok(Self {
            id: StorageAreaId::new(row.id),
            factory_id: FactoryId::new(row.factory_id),
            area_name,
            size,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StorageAreaOccupancyRow {
    #[sqlx(flatten)]
    area: StorageAreaRow,
    occupied_coordinates: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CoordinateRow {
    id: i32,
    x: i32,
    y: i32,
    item_codes: Vec<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    inventory_id: i32,
    x: i32,
    y: i32,
}

/// Repository for storage area reads.
pub struct StorageAreaRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StorageAreaRepository<'a> {
    /// Create a new storage area repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List areas within `scope` with their occupied coordinate counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(
        &self,
        scope: &FactoryScope,
        filter: &StorageAreaFilter,
    ) -> Result<Vec<(StorageArea, i64)>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(AREA_COLUMNS)
            .push(", ")
            .push(OCCUPIED_SUBQUERY)
            .push(" FROM stock.storage_area s WHERE TRUE");
        push_factory_filter(&mut qb, "s.factory_id", scope);
        if let Some(factory_id) = filter.factory_id {
            qb.push(" AND s.factory_id = ").push_bind(factory_id);
        }
        qb.push(" ORDER BY s.factory_id, s.area_name");

        let rows = qb
            .build_query_as::<StorageAreaOccupancyRow>()
            .fetch_all(self.pool)
            .await?;

        rows.into_iter()
            .map(|r| StorageArea::try_from(r.area).map(|area| (area, r.occupied_coordinates)))
            .collect()
    }

    /// Get an area with its occupied coordinate count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get(
        &self,
        id: StorageAreaId,
    ) -> Result<Option<(StorageArea, i64)>, RepositoryError> {
        let sql = format!(
            "SELECT {AREA_COLUMNS}, {OCCUPIED_SUBQUERY} FROM stock.storage_area s WHERE s.id = $1"
        );
        let row = sqlx::query_as::<_, StorageAreaOccupancyRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(|r| {
            StorageArea::try_from(r.area).map(|area| (area, r.occupied_coordinates))
        })
        .transpose()
    }

    /// Every coordinate of an area ordered by `(x, y)`, with stored item codes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_coordinates(
        &self,
        area: &StorageArea,
    ) -> Result<Vec<Coordinate>, RepositoryError> {
        let rows = sqlx::query_as::<_, CoordinateRow>(
            r"
            SELECT c.id, c.x, c.y,
                   COALESCE(
                       array_agg(i.item_code ORDER BY i.item_code)
                           FILTER (WHERE i.id IS NOT NULL),
                       '{}'
                   ) AS item_codes
            FROM stock.coordinate c
            LEFT JOIN stock.inventory i ON i.coordinate_id = c.id
            WHERE c.storage_area_id = $1
            GROUP BY c.id, c.x, c.y
            ORDER BY c.x, c.y
            ",
        )
        .bind(area.id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                Coordinate::new(
                    CoordinateId::new(r.id),
                    area.id,
                    area.area_name,
                    Cell::new(r.x, r.y),
                    r.item_codes,
                )
            })
            .collect())
    }
}

// =============================================================================
// Transactional grid operations
// =============================================================================

/// Insert a storage area row.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the name is taken in the factory.
pub async fn insert(
    conn: &mut PgConnection,
    factory_id: FactoryId,
    area_name: AreaName,
    size: GridSize,
    description: Option<&str>,
) -> Result<StorageArea, RepositoryError> {
    let sql = format!(
        "INSERT INTO stock.storage_area AS s (factory_id, area_name, width, height, description) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {AREA_COLUMNS}"
    );
    let row = sqlx::query_as::<_, StorageAreaRow>(&sql)
        .bind(factory_id)
        .bind(area_name.to_string())
        .bind(size.width())
        .bind(size.height())
        .bind(description)
        .fetch_one(&mut *conn)
        .await?;

    row.try_into()
}

/// Lock an area row for the rest of the transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Contention` if the lock times out.
pub async fn lock(
    conn: &mut PgConnection,
    id: StorageAreaId,
) -> Result<Option<StorageArea>, RepositoryError> {
    let sql = format!("SELECT {AREA_COLUMNS} FROM stock.storage_area s WHERE s.id = $1 FOR UPDATE");
    let row = sqlx::query_as::<_, StorageAreaRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    row.map(TryInto::try_into).transpose()
}

/// Create one coordinate per cell of `size`.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if any cell already exists.
pub async fn generate_coordinates(
    conn: &mut PgConnection,
    area_id: StorageAreaId,
    size: GridSize,
) -> Result<u64, RepositoryError> {
    let (xs, ys) = size.columns();
    let result = sqlx::query(
        r"
        INSERT INTO stock.coordinate (storage_area_id, x, y)
        SELECT $1, cell.x, cell.y
        FROM UNNEST($2::int4[], $3::int4[]) AS cell(x, y)
        ",
    )
    .bind(area_id)
    .bind(xs)
    .bind(ys)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Items currently placed on a coordinate of the area, with their cell.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn occupied_links(
    conn: &mut PgConnection,
    area_id: StorageAreaId,
) -> Result<Vec<(InventoryId, Cell)>, RepositoryError> {
    let rows = sqlx::query_as::<_, LinkRow>(
        r"
        SELECT i.id AS inventory_id, c.x, c.y
        FROM stock.inventory i
        JOIN stock.coordinate c ON c.id = i.coordinate_id
        WHERE c.storage_area_id = $1
        ORDER BY i.id
        FOR UPDATE OF i
        ",
    )
    .bind(area_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| (InventoryId::new(r.inventory_id), Cell::new(r.x, r.y)))
        .collect())
}

/// Null the coordinate reference of every item placed in the area, then
/// delete all of the area's coordinates.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a statement fails.
pub async fn clear_grid(conn: &mut PgConnection, area_id: StorageAreaId) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE stock.inventory
        SET coordinate_id = NULL
        WHERE coordinate_id IN (SELECT id FROM stock.coordinate WHERE storage_area_id = $1)
        ",
    )
    .bind(area_id)
    .execute(&mut *conn)
    .await?;

    sqlx::query("DELETE FROM stock.coordinate WHERE storage_area_id = $1")
        .bind(area_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Point each item at the regenerated coordinate for its former cell.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails.
pub async fn repoint_items(
    conn: &mut PgConnection,
    area_id: StorageAreaId,
    links: &[(InventoryId, Cell)],
) -> Result<u64, RepositoryError> {
    if links.is_empty() {
        return Ok(0);
    }
    let ids: Vec<i32> = links.iter().map(|(id, _)| id.as_i32()).collect();
    let xs: Vec<i32> = links.iter().map(|(_, c)| c.x).collect();
    let ys: Vec<i32> = links.iter().map(|(_, c)| c.y).collect();

    let result = sqlx::query(
        r"
        UPDATE stock.inventory i
        SET coordinate_id = c.id
        FROM UNNEST($2::int4[], $3::int4[], $4::int4[]) AS k(inventory_id, x, y),
             stock.coordinate c
        WHERE i.id = k.inventory_id
          AND c.storage_area_id = $1
          AND c.x = k.x
          AND c.y = k.y
        ",
    )
    .bind(area_id)
    .bind(ids)
    .bind(xs)
    .bind(ys)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Update description and dimensions.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the area doesn't exist.
pub async fn update(
    conn: &mut PgConnection,
    id: StorageAreaId,
    size: GridSize,
    description: Option<&str>,
) -> Result<StorageArea, RepositoryError> {
    let sql = format!(
        "UPDATE stock.storage_area AS s \
         SET width = $2, height = $3, description = COALESCE($4, description) \
         WHERE s.id = $1 RETURNING {AREA_COLUMNS}"
    );
    let row = sqlx::query_as::<_, StorageAreaRow>(&sql)
        .bind(id)
        .bind(size.width())
        .bind(size.height())
        .bind(description)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    row.try_into()
}

/// Storage area and factory a coordinate belongs to.
///
/// Takes a share lock on the area row until the transaction ends, so a
/// placement and a regeneration of the same grid serialize: a resize either
/// sees the new link and re-points it, or commits first and the placement
/// fails the coordinate foreign key.
///
/// # Errors
///
/// Returns `RepositoryError::Contention` if the lock times out.
pub async fn coordinate_owner(
    conn: &mut PgConnection,
    coordinate_id: CoordinateId,
) -> Result<Option<(StorageAreaId, FactoryId)>, RepositoryError> {
    let row: Option<(i32, i32)> = sqlx::query_as(
        r"
        SELECT s.id, s.factory_id
        FROM stock.coordinate c
        JOIN stock.storage_area s ON s.id = c.storage_area_id
        WHERE c.id = $1
        FOR SHARE OF s
        ",
    )
    .bind(coordinate_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(|(area, factory)| (StorageAreaId::new(area), FactoryId::new(factory))))
}
