//! Stock ledger entry models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use factory_inventory_core::{AccountId, FactoryId, InventoryId, MovementType, StockMovementId};

/// One immutable ledger entry.
#[derive(Debug, Clone, Serialize)]
pub struct StockMovement {
    pub id: StockMovementId,
    pub inventory_id: InventoryId,
    pub item_code: String,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub reason: Option<String>,
    pub account_id: AccountId,
    pub factory_id: FactoryId,
    pub created_at: DateTime<Utc>,
}

/// Result of booking a movement.
#[derive(Debug, Clone, Serialize)]
pub struct MovementReceipt {
    pub movement: StockMovement,
    pub stock_quantity: i32,
}

/// Input for booking a movement.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMovementInput {
    pub inventory_id: InventoryId,
    pub factory_id: FactoryId,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub reason: Option<String>,
}

/// Filter criteria for listing movements.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovementFilter {
    pub inventory_id: Option<InventoryId>,
    pub factory_id: Option<FactoryId>,
    pub movement_type: Option<MovementType>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
