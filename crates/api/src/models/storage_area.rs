//! Storage area and coordinate models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use factory_inventory_core::{
    AreaName, Cell, CoordinateId, FactoryId, GridSize, Occupancy, StorageAreaId,
};

/// A lettered grid region within a factory.
#[derive(Debug, Clone, Serialize)]
pub struct StorageArea {
    pub id: StorageAreaId,
    pub factory_id: FactoryId,
    pub area_name: AreaName,
    pub size: GridSize,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A storage area together with its occupancy figures.
#[derive(Debug, Clone, Serialize)]
pub struct StorageAreaDetail {
    pub id: StorageAreaId,
    pub factory_id: FactoryId,
    pub area_name: AreaName,
    pub width: i32,
    pub height: i32,
    pub description: Option<String>,
    pub total_coordinates: i64,
    pub occupied_coordinates: i64,
    pub utilization_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StorageAreaDetail {
    /// Combine an area with its occupied cell count.
    #[must_use]
    pub fn new(area: StorageArea, occupied_coordinates: i64) -> Self {
        let occupancy = Occupancy::new(area.size.total(), occupied_coordinates);
        Self {
            id: area.id,
            factory_id: area.factory_id,
            area_name: area.area_name,
            width: area.size.width(),
            height: area.size.height(),
            description: area.description,
            total_coordinates: occupancy.total_coordinates,
            occupied_coordinates: occupancy.occupied_coordinates,
            utilization_rate: occupancy.utilization_rate(),
            created_at: area.created_at,
            updated_at: area.updated_at,
        }
    }
}

/// One cell of a storage area grid.
#[derive(Debug, Clone, Serialize)]
pub struct Coordinate {
    pub id: CoordinateId,
    pub storage_area_id: StorageAreaId,
    pub x: i32,
    pub y: i32,
    /// e.g. `A-1-2`
    pub name: String,
    /// e.g. `1-2`
    pub position_name: String,
    pub is_occupied: bool,
    /// Codes of the items stored on this cell.
    pub item_codes: Vec<String>,
}

impl Coordinate {
    #[must_use]
    pub fn new(
        id: CoordinateId,
        storage_area_id: StorageAreaId,
        area_name: AreaName,
        cell: Cell,
        item_codes: Vec<String>,
    ) -> Self {
        Self {
            id,
            storage_area_id,
            x: cell.x,
            y: cell.y,
            name: cell.coordinate_name(area_name),
            position_name: cell.position_name(),
            is_occupied: !item_codes.is_empty(),
            item_codes,
        }
    }
}

/// Input for creating a storage area.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStorageAreaInput {
    pub factory_id: FactoryId,
    pub area_name: String,
    pub width: i32,
    pub height: i32,
    pub description: Option<String>,
}

/// Partial update of a storage area. Dimension changes regenerate the grid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStorageAreaInput {
    pub description: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// Filter criteria for listing storage areas.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageAreaFilter {
    pub factory_id: Option<FactoryId>,
}
