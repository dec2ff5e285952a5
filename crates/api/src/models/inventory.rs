//! Inventory item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use factory_inventory_core::{CoordinateId, FactoryId, InventoryId, StorageLocation, UnitPrice};

/// An inventory item.
///
/// `stock_quantity` only ever changes through the stock ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Inventory {
    pub id: InventoryId,
    pub item_code: String,
    pub product_name: String,
    pub standard: Option<String>,
    pub category: String,
    pub stock_quantity: i32,
    pub lowest_stock: i32,
    pub unit: String,
    pub unit_price: UnitPrice,
    pub supplier: Option<String>,
    pub location: Option<StorageLocation>,
    pub memo: Option<String>,
    pub factory_id: FactoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inventory {
    /// Display name of the location, if any.
    #[must_use]
    pub fn location_name(&self) -> Option<String> {
        self.location.as_ref().map(StorageLocation::display_name)
    }

    /// At or below the reorder threshold.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.lowest_stock
    }
}

/// Presentation shape of an item, with derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryView {
    #[serde(flatten)]
    pub item: Inventory,
    pub location_name: Option<String>,
    pub is_low_stock: bool,
}

impl From<Inventory> for InventoryView {
    fn from(item: Inventory) -> Self {
        Self {
            location_name: item.location_name(),
            is_low_stock: item.is_low_stock(),
            item,
        }
    }
}

/// Requested placement of an item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationInput {
    /// Free-text place name.
    LegacyText { name: String },
    /// A coordinate of a storage area in the item's factory.
    GridCell { coordinate_id: CoordinateId },
    /// Clear the location.
    Unassigned,
}

impl LocationInput {
    /// Split into the `(coordinate_id, storing_place)` column pair.
    #[must_use]
    pub fn into_columns(self) -> (Option<CoordinateId>, Option<String>) {
        match self {
            Self::GridCell { coordinate_id } => (Some(coordinate_id), None),
            Self::LegacyText { name } => {
                let name = name.trim();
                if name.is_empty() {
                    (None, None)
                } else {
                    (None, Some(name.to_owned()))
                }
            }
            Self::Unassigned => (None, None),
        }
    }
}

/// Input for registering an item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInventoryInput {
    pub item_code: String,
    pub product_name: String,
    pub standard: Option<String>,
    pub category: String,
    /// Opening stock, booked as an `in` ledger entry.
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default)]
    pub lowest_stock: i32,
    pub unit: String,
    #[serde(default)]
    pub unit_price: Decimal,
    pub supplier: Option<String>,
    pub location: Option<LocationInput>,
    pub memo: Option<String>,
    pub factory_id: FactoryId,
}

/// Partial update of an item's descriptive fields and location.
///
/// There is deliberately no stock field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInventoryInput {
    pub product_name: Option<String>,
    pub standard: Option<String>,
    pub category: Option<String>,
    pub lowest_stock: Option<i32>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub supplier: Option<String>,
    pub location: Option<LocationInput>,
    pub memo: Option<String>,
}

/// Filter criteria for listing items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryFilter {
    pub factory_id: Option<FactoryId>,
    pub category: Option<String>,
    /// Substring of item code or product name.
    pub search: Option<String>,
    #[serde(default)]
    pub low_stock_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_location_input_shapes() {
        let grid: LocationInput =
            serde_json::from_str(r#"{"kind":"grid_cell","coordinate_id":4}"#).unwrap();
        assert_eq!(grid.into_columns(), (Some(CoordinateId::new(4)), None));

        let text: LocationInput =
            serde_json::from_str(r#"{"kind":"legacy_text","name":" Rack 2 "}"#).unwrap();
        assert_eq!(text.into_columns(), (None, Some("Rack 2".to_owned())));

        let none: LocationInput = serde_json::from_str(r#"{"kind":"unassigned"}"#).unwrap();
        assert_eq!(none.into_columns(), (None, None));
    }

    #[test]
    fn test_update_has_no_stock_field() {
        let patch: UpdateInventoryInput =
            serde_json::from_str(r#"{"stock_quantity": 999, "memo": "moved"}"#).unwrap();
        assert_eq!(patch.memo.as_deref(), Some("moved"));
    }
}
