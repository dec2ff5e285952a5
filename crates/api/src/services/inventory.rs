//! Inventory item registration and maintenance.
//!
//! Stock quantity is never written here except through the opening-balance
//! ledger entry booked at creation.

use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use factory_inventory_core::{
    Actor, CoordinateId, FactoryId, FactoryScope, MovementType, Permission, UnitPrice,
};

use super::ledger::{OPENING_BALANCE_REASON, book, fresh_item, opening_quantity};
use super::{AccessService, ServiceError, non_blank, required};
use crate::db::inventory::{self as items, InventoryPatch, LockedItem, NewInventory};
use crate::db::{self, InventoryRepository, RepositoryError, storage_areas};
use crate::models::{
    CreateInventoryInput, InventoryFilter, InventoryView, LocationInput, UpdateInventoryInput,
};

/// Inventory item operations.
pub struct InventoryService<'a> {
    pool: &'a PgPool,
    access: AccessService<'a>,
    items: InventoryRepository<'a>,
}

impl<'a> InventoryService<'a> {
    /// Create a new inventory service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            access: AccessService::new(pool),
            items: InventoryRepository::new(pool),
        }
    }

    /// Items in the actor's scope.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` on storage failure.
    #[instrument(skip(self, filter), fields(account_id = %actor.account_id))]
    pub async fn list(
        &self,
        actor: &Actor,
        filter: &InventoryFilter,
    ) -> Result<Vec<InventoryView>, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        let items = self.items.list(&scope, filter).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// One item by code.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if it doesn't exist or is out of scope.
    #[instrument(skip(self), fields(account_id = %actor.account_id))]
    pub async fn get(&self, actor: &Actor, item_code: &str) -> Result<InventoryView, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        self.items
            .get_by_code(item_code)
            .await?
            .filter(|item| scope.contains(item.factory_id))
            .map(Into::into)
            .ok_or_else(|| item_not_found(item_code))
    }

    /// Register an item. A positive opening stock is booked as an inbound
    /// ledger entry in the same transaction.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Validation` for blank or negative fields, a taken
    ///   item code or a coordinate outside the item's factory
    /// - `ServiceError::NotFound` if the factory is out of scope
    /// - `ServiceError::PermissionDenied` without inventory permission
    #[instrument(skip(self, input), fields(account_id = %actor.account_id, factory_id = %input.factory_id))]
    pub async fn create(
        &self,
        actor: &Actor,
        input: &CreateInventoryInput,
    ) -> Result<InventoryView, ServiceError> {
        let item_code = required("item_code", &input.item_code)?;
        let product_name = required("product_name", &input.product_name)?;
        let category = required("category", &input.category)?;
        let unit = required("unit", &input.unit)?;
        let lowest_stock = non_negative("lowest_stock", input.lowest_stock)?;
        let unit_price = UnitPrice::new(input.unit_price)?;
        let opening = opening_quantity(input.stock_quantity)?;
        let (coordinate_id, storing_place) = input
            .location
            .clone()
            .map_or((None, None), LocationInput::into_columns);

        let scope = self.access.resolve_scope(actor).await?;
        scope.ensure_permission(input.factory_id, Permission::Inventory)?;

        let mut tx = db::begin_locking(self.pool).await?;
        if let Some(coordinate_id) = coordinate_id {
            let owner = lock_placement(&mut tx, coordinate_id).await?;
            ensure_same_factory(coordinate_id, owner, input.factory_id)?;
        }
        let id = items::insert(
            &mut tx,
            &NewInventory {
                item_code,
                product_name,
                standard: non_blank(input.standard.as_deref()),
                category,
                stock_quantity: 0,
                lowest_stock,
                unit,
                unit_price,
                supplier: non_blank(input.supplier.as_deref()),
                coordinate_id,
                storing_place: storing_place.as_deref(),
                memo: non_blank(input.memo.as_deref()),
                factory_id: input.factory_id,
            },
        )
        .await?;
        if let Some(quantity) = opening {
            book(
                &mut tx,
                &fresh_item(id, input.factory_id),
                MovementType::In,
                quantity,
                Some(OPENING_BALANCE_REASON),
                &actor.account_id,
            )
            .await?;
        }
        let item = items::fetch(&mut tx, id).await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            item_id = %item.id,
            item_code = %item.item_code,
            factory_id = %item.factory_id,
            stock_quantity = item.stock_quantity,
            "inventory item created"
        );
        Ok(item.into())
    }

    /// Update descriptive fields and location.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`], plus `ServiceError::NotFound` for an
    /// unknown item code.
    #[instrument(skip(self, input), fields(account_id = %actor.account_id))]
    pub async fn update(
        &self,
        actor: &Actor,
        item_code: &str,
        input: &UpdateInventoryInput,
    ) -> Result<InventoryView, ServiceError> {
        let product_name = input
            .product_name
            .as_deref()
            .map(|v| required("product_name", v))
            .transpose()?;
        let category = input
            .category
            .as_deref()
            .map(|v| required("category", v))
            .transpose()?;
        let unit = input
            .unit
            .as_deref()
            .map(|v| required("unit", v))
            .transpose()?;
        let lowest_stock = input
            .lowest_stock
            .map(|v| non_negative("lowest_stock", v))
            .transpose()?;
        let unit_price = input.unit_price.map(UnitPrice::new).transpose()?;
        let location = input.location.clone().map(LocationInput::into_columns);

        let scope = self.access.resolve_scope(actor).await?;
        let mut tx = db::begin_locking(self.pool).await?;
        // Area before item, the same order a resize takes its locks in
        let placement = match &location {
            Some((Some(coordinate_id), _)) => {
                Some((*coordinate_id, lock_placement(&mut tx, *coordinate_id).await?))
            }
            _ => None,
        };
        let item = self.lock_writable(&mut tx, &scope, item_code).await?;
        if let Some((coordinate_id, owner)) = placement {
            ensure_same_factory(coordinate_id, owner, item.factory_id)?;
        }
        items::update(
            &mut tx,
            item.id,
            &InventoryPatch {
                product_name,
                standard: clearable(input.standard.as_deref()),
                category,
                lowest_stock,
                unit,
                unit_price,
                supplier: clearable(input.supplier.as_deref()),
                location: location
                    .as_ref()
                    .map(|(coordinate_id, place)| (*coordinate_id, place.as_deref())),
                memo: clearable(input.memo.as_deref()),
            },
        )
        .await?;
        let updated = items::fetch(&mut tx, item.id).await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        info!(item_id = %updated.id, factory_id = %updated.factory_id, "inventory item updated");
        Ok(updated.into())
    }

    /// Delete an item that has no ledger or stocktaking history.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if history exists,
    /// `ServiceError::NotFound` if the item is missing or out of scope.
    #[instrument(skip(self), fields(account_id = %actor.account_id))]
    pub async fn delete(&self, actor: &Actor, item_code: &str) -> Result<(), ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        let mut tx = db::begin_locking(self.pool).await?;
        let item = self.lock_writable(&mut tx, &scope, item_code).await?;
        items::delete(&mut tx, item.id).await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        info!(item_id = %item.id, factory_id = %item.factory_id, "inventory item deleted");
        Ok(())
    }

    async fn lock_writable(
        &self,
        conn: &mut PgConnection,
        scope: &FactoryScope,
        item_code: &str,
    ) -> Result<LockedItem, ServiceError> {
        let item = items::lock_by_code(conn, item_code)
            .await?
            .filter(|item| scope.contains(item.factory_id))
            .ok_or_else(|| item_not_found(item_code))?;
        scope.ensure_permission(item.factory_id, Permission::Inventory)?;
        Ok(item)
    }
}

/// Factory owning a coordinate, with its storage area share-locked for the
/// rest of the transaction.
async fn lock_placement(
    conn: &mut PgConnection,
    coordinate_id: CoordinateId,
) -> Result<FactoryId, ServiceError> {
    storage_areas::coordinate_owner(conn, coordinate_id)
        .await?
        .map(|(_, owner)| owner)
        .ok_or_else(|| {
            ServiceError::Validation(format!("coordinate {coordinate_id} does not exist"))
        })
}

/// Reject coordinates of another factory's storage areas.
fn ensure_same_factory(
    coordinate_id: CoordinateId,
    owner: FactoryId,
    factory_id: FactoryId,
) -> Result<(), ServiceError> {
    if owner == factory_id {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!(
            "coordinate {coordinate_id} belongs to another factory"
        )))
    }
}

/// A sent optional text field: blank clears the column, absent leaves it.
fn clearable(value: Option<&str>) -> Option<Option<&str>> {
    value.map(|v| non_blank(Some(v)))
}

fn non_negative(field: &str, value: i32) -> Result<i32, ServiceError> {
    if value < 0 {
        return Err(ServiceError::Validation(format!(
            "{field} cannot be negative (got {value})"
        )));
    }
    Ok(value)
}

fn item_not_found(item_code: &str) -> ServiceError {
    ServiceError::not_found(format!("item {item_code}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clearable_text() {
        assert_eq!(clearable(None), None);
        assert_eq!(clearable(Some("   ")), Some(None));
        assert_eq!(clearable(Some(" M8 ")), Some(Some("M8")));
    }

    #[test]
    fn test_foreign_coordinate_is_rejected() {
        let cell = CoordinateId::new(7);
        assert!(ensure_same_factory(cell, FactoryId::new(1), FactoryId::new(1)).is_ok());
        assert!(matches!(
            ensure_same_factory(cell, FactoryId::new(2), FactoryId::new(1)),
            Err(ServiceError::Validation(ref m)) if m.contains("another factory")
        ));
    }

    #[test]
    fn test_non_negative() {
        assert!(matches!(non_negative("lowest_stock", 0), Ok(0)));
        assert!(matches!(
            non_negative("lowest_stock", -2),
            Err(ServiceError::Validation(ref m)) if m.contains("lowest_stock")
        ));
    }
}
