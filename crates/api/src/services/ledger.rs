//! Stock ledger.
//!
//! A movement and the quantity change it causes are written in one
//! transaction that holds the item's row lock from the stock check until
//! commit. Two concurrent outbound movements therefore serialize, and the
//! second one sees the stock left by the first.

use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use factory_inventory_core::{
    AccountId, Actor, FactoryId, InventoryId, MovementQuantity, MovementType, Permission, ledger,
};

use super::{AccessService, ServiceError, non_blank};
use crate::db::inventory::{self as items, LockedItem};
use crate::db::stock_movements::{self, NewMovement};
use crate::db::{self, RepositoryError, StockMovementRepository};
use crate::models::{CreateMovementInput, MovementFilter, MovementReceipt, StockMovement};

/// Reason recorded on the entry that books an item's opening stock.
pub const OPENING_BALANCE_REASON: &str = "opening balance";

/// Stock movement operations.
pub struct LedgerService<'a> {
    pool: &'a PgPool,
    access: AccessService<'a>,
    movements: StockMovementRepository<'a>,
}

impl<'a> LedgerService<'a> {
    /// Create a new ledger service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            access: AccessService::new(pool),
            movements: StockMovementRepository::new(pool),
        }
    }

    /// Ledger entries in the actor's scope, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` on storage failure.
    #[instrument(skip(self, filter), fields(account_id = %actor.account_id))]
    pub async fn list(
        &self,
        actor: &Actor,
        filter: &MovementFilter,
    ) -> Result<Vec<StockMovement>, ServiceError> {
        let scope = self.access.resolve_scope(actor).await?;
        Ok(self.movements.list(&scope, filter).await?)
    }

    /// Book a movement and adjust the item's stock.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Validation` for a non-positive quantity or when the
    ///   item belongs to another factory than the one given
    /// - `ServiceError::NotFound` if the item is missing or out of scope
    /// - `ServiceError::PermissionDenied` without inventory permission
    /// - `ServiceError::InsufficientStock` when an outbound movement exceeds
    ///   the stock on hand; nothing is written
    /// - `ServiceError::Conflict` if the item stays locked past the timeout
    #[instrument(
        skip(self, input),
        fields(
            account_id = %actor.account_id,
            item_id = %input.inventory_id,
            factory_id = %input.factory_id,
            movement_type = %input.movement_type,
            quantity = input.quantity,
        )
    )]
    pub async fn apply_movement(
        &self,
        actor: &Actor,
        input: &CreateMovementInput,
    ) -> Result<MovementReceipt, ServiceError> {
        let quantity = MovementQuantity::new(input.quantity)?;
        let scope = self.access.resolve_scope(actor).await?;

        let mut tx = db::begin_locking(self.pool).await?;
        let item = items::lock_by_id(&mut tx, input.inventory_id)
            .await?
            .filter(|item| scope.contains(item.factory_id))
            .ok_or_else(|| item_not_found(input.inventory_id))?;
        if item.factory_id != input.factory_id {
            return Err(ServiceError::Validation(format!(
                "item {} belongs to factory {}, not factory {}",
                item.id, item.factory_id, input.factory_id
            )));
        }
        scope.ensure_permission(item.factory_id, Permission::Inventory)?;

        let receipt = book(
            &mut tx,
            &item,
            input.movement_type,
            quantity,
            non_blank(input.reason.as_deref()),
            &actor.account_id,
        )
        .await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            movement_id = %receipt.movement.id,
            stock_quantity = receipt.stock_quantity,
            "stock movement booked"
        );
        Ok(receipt)
    }
}

/// Write one ledger entry and the resulting stock for an item whose row is
/// locked by the caller's transaction.
///
/// # Errors
///
/// Returns `ServiceError::InsufficientStock` before writing anything when
/// the movement would overdraw the item.
pub(crate) async fn book(
    conn: &mut PgConnection,
    item: &LockedItem,
    movement_type: MovementType,
    quantity: MovementQuantity,
    reason: Option<&str>,
    account_id: &AccountId,
) -> Result<MovementReceipt, ServiceError> {
    let stock_quantity = ledger::apply(item.stock_quantity, movement_type, quantity)?;

    let movement = stock_movements::insert(
        conn,
        &NewMovement {
            inventory_id: item.id,
            movement_type,
            quantity,
            reason,
            account_id,
            factory_id: item.factory_id,
        },
    )
    .await?;
    items::set_stock(conn, item.id, stock_quantity).await?;

    Ok(MovementReceipt {
        movement,
        stock_quantity,
    })
}

fn item_not_found(id: InventoryId) -> ServiceError {
    ServiceError::not_found(format!("item {id}"))
}

/// Opening stock booked as an inbound entry, if any.
///
/// # Errors
///
/// Returns `ServiceError::Validation` for a negative opening stock.
pub(crate) fn opening_quantity(stock_quantity: i32) -> Result<Option<MovementQuantity>, ServiceError> {
    match stock_quantity {
        0 => Ok(None),
        q if q < 0 => Err(ServiceError::Validation(format!(
            "stock quantity cannot be negative (got {q})"
        ))),
        q => Ok(Some(MovementQuantity::new(q)?)),
    }
}

/// The locked-item view of a freshly inserted item with zero stock.
pub(crate) const fn fresh_item(id: InventoryId, factory_id: FactoryId) -> LockedItem {
    LockedItem {
        id,
        factory_id,
        stock_quantity: 0,
    }
}
