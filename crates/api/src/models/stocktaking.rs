//! Stocktaking models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use factory_inventory_core::{
    AccountId, DiscrepancyKind, FactoryId, InventoryId, StocktakingId, StocktakingStatus,
};

/// One physical count.
#[derive(Debug, Clone, Serialize)]
pub struct Stocktaking {
    pub id: StocktakingId,
    pub inventory_id: InventoryId,
    pub item_code: String,
    pub factory_id: FactoryId,
    pub theoretical_stock: i32,
    pub actual_stock: i32,
    pub difference: i32,
    pub discrepancy: DiscrepancyKind,
    pub account_id: AccountId,
    pub status: StocktakingStatus,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a count.
///
/// Any client-sent `difference` is not part of this shape and is dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordCountInput {
    pub inventory_id: InventoryId,
    /// Defaults to the item's stock at recording time.
    pub theoretical_stock: Option<i32>,
    pub actual_stock: i32,
    #[serde(default)]
    pub status: StocktakingStatus,
    pub memo: Option<String>,
}

/// Filter criteria for listing counts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StocktakingFilter {
    pub inventory_id: Option<InventoryId>,
    pub factory_id: Option<FactoryId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
