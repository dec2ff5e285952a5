//! Where an inventory item is stored.
//!
//! Items either sit on a grid coordinate or carry a free-text place from
//! before grids existed. Never both: the grid cell wins when a row somehow
//! has both.

use serde::{Deserialize, Serialize};

use crate::grid::Cell;
use crate::types::{AreaName, CoordinateId, StorageAreaId};

/// Storage location of an inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageLocation {
    /// Free-text place name.
    LegacyText { name: String },
    /// A cell of a storage area grid.
    GridCell {
        coordinate_id: CoordinateId,
        storage_area_id: StorageAreaId,
        area_name: AreaName,
        x: i32,
        y: i32,
    },
}

impl StorageLocation {
    /// Build a location from the nullable columns of an inventory row.
    ///
    /// Blank free text counts as no location.
    #[must_use]
    pub fn resolve(grid: Option<GridRef>, storing_place: Option<&str>) -> Option<Self> {
        if let Some(g) = grid {
            return Some(Self::GridCell {
                coordinate_id: g.coordinate_id,
                storage_area_id: g.storage_area_id,
                area_name: g.area_name,
                x: g.cell.x,
                y: g.cell.y,
            });
        }
        storing_place
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self::LegacyText { name: s.to_owned() })
    }

    /// Display name: `A-1-2` for grid cells, the text otherwise.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::LegacyText { name } => name.clone(),
            Self::GridCell {
                area_name, x, y, ..
            } => Cell::new(*x, *y).coordinate_name(*area_name),
        }
    }

    #[must_use]
    pub const fn coordinate_id(&self) -> Option<CoordinateId> {
        match self {
            Self::GridCell { coordinate_id, .. } => Some(*coordinate_id),
            Self::LegacyText { .. } => None,
        }
    }
}

/// A joined coordinate reference as read from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRef {
    pub coordinate_id: CoordinateId,
    pub storage_area_id: StorageAreaId,
    pub area_name: AreaName,
    pub cell: Cell,
}
