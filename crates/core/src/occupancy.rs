//! Occupancy figures for a storage area.

use serde::{Deserialize, Serialize};

/// How many of an area's coordinates hold at least one inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Occupancy {
    /// `width × height`.
    pub total_coordinates: i64,
    /// Distinct coordinates referenced by at least one item.
    pub occupied_coordinates: i64,
}

impl Occupancy {
    #[must_use]
    pub const fn new(total_coordinates: i64, occupied_coordinates: i64) -> Self {
        Self {
            total_coordinates,
            occupied_coordinates,
        }
    }

    /// Occupied share in percent. Exactly `0.0` for an empty grid.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // grids are bounded far below 2^52 cells
    pub fn utilization_rate(&self) -> f64 {
        if self.total_coordinates <= 0 {
            return 0.0;
        }
        self.occupied_coordinates as f64 / self.total_coordinates as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_total_is_zero_rate() {
        let occ = Occupancy::new(0, 0);
        assert!(occ.utilization_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn test_fully_occupied_is_hundred() {
        let occ = Occupancy::new(9, 9);
        assert!((occ.utilization_rate() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial() {
        let occ = Occupancy::new(4, 1);
        assert!((occ.utilization_rate() - 25.0).abs() < f64::EPSILON);
    }
}
