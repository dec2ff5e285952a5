//! Storage area coordinate grids.
//!
//! A storage area of `width × height` owns exactly one coordinate per cell
//! `(x, y)` with `x ∈ [1, width]` and `y ∈ [1, height]`: no gaps, no
//! duplicates. This module enumerates those cells and decides what a resize
//! has to do; persisting the result is the caller's job.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::AreaName;

/// Largest accepted width or height.
pub const MAX_DIMENSION: i32 = 100;

/// Errors raised when validating grid dimensions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Width below 1.
    #[error("width must be at least 1 (got {0})")]
    NonPositiveWidth(i32),
    /// Height below 1.
    #[error("height must be at least 1 (got {0})")]
    NonPositiveHeight(i32),
    /// Width or height above [`MAX_DIMENSION`].
    #[error("width and height must be at most {MAX_DIMENSION} (got {width}x{height})")]
    TooLarge {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
}

/// One cell of a grid, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position name, e.g. `1-2`.
    #[must_use]
    pub fn position_name(&self) -> String {
        format!("{}-{}", self.x, self.y)
    }

    /// Full coordinate name within an area, e.g. `A-1-2`.
    #[must_use]
    pub fn coordinate_name(&self, area: AreaName) -> String {
        format!("{area}-{}-{}", self.x, self.y)
    }
}

/// Validated dimensions of a storage area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: i32,
    height: i32,
}

impl GridSize {
    /// Validate and build grid dimensions.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if either dimension is below 1 or above
    /// [`MAX_DIMENSION`].
    pub const fn new(width: i32, height: i32) -> Result<Self, GridError> {
        if width < 1 {
            return Err(GridError::NonPositiveWidth(width));
        }
        if height < 1 {
            return Err(GridError::NonPositiveHeight(height));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(GridError::TooLarge { width, height });
        }
        Ok(Self { width, height })
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells, `width × height`.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x >= 1 && cell.x <= self.width && cell.y >= 1 && cell.y <= self.height
    }

    /// Every cell, ordered by `x` then `y`.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let height = self.height;
        (1..=self.width).flat_map(move |x| (1..=height).map(move |y| Cell::new(x, y)))
    }

    /// Columns for a bulk `UNNEST` insert: all `x` values, then all `y` values.
    #[must_use]
    pub fn columns(&self) -> (Vec<i32>, Vec<i32>) {
        self.cells().map(|c| (c.x, c.y)).unzip()
    }

    /// Decide how to move from `self` to `target`.
    #[must_use]
    pub fn plan_resize(&self, target: Self) -> ResizePlan {
        if *self == target {
            ResizePlan::Unchanged
        } else {
            ResizePlan::Regenerate {
                from: *self,
                to: target,
            }
        }
    }
}

/// Outcome of comparing current and requested dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePlan {
    /// Same dimensions: the grid and every occupancy link stay untouched.
    Unchanged,
    /// Coordinates are dropped and regenerated at the new size.
    Regenerate { from: GridSize, to: GridSize },
}

impl ResizePlan {
    /// Split occupied cells into those that survive the resize and those
    /// that fall outside the new grid and must be detached.
    ///
    /// For [`ResizePlan::Unchanged`] every cell survives.
    #[must_use]
    pub fn partition<T>(&self, occupied: Vec<(T, Cell)>) -> (Vec<(T, Cell)>, Vec<(T, Cell)>) {
        match self {
            Self::Unchanged => (occupied, Vec::new()),
            Self::Regenerate { to, .. } => occupied
                .into_iter()
                .partition(|(_, cell)| to.contains(*cell)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_produces_every_cell_once() {
        for (w, h) in [(1, 1), (3, 3), (2, 5), (7, 1), (MAX_DIMENSION, 4)] {
            let grid = GridSize::new(w, h).unwrap();
            let cells: Vec<Cell> = grid.cells().collect();
            let unique: HashSet<Cell> = cells.iter().copied().collect();

            assert_eq!(cells.len() as i64, grid.total());
            assert_eq!(unique.len(), cells.len());
            assert!(cells.iter().all(|c| grid.contains(*c)));
        }
    }

    #[test]
    fn test_cells_are_ordered_x_then_y() {
        let grid = GridSize::new(2, 2).unwrap();
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(1, 1),
                Cell::new(1, 2),
                Cell::new(2, 1),
                Cell::new(2, 2)
            ]
        );
    }

    #[test]
    fn test_columns_align() {
        let (xs, ys) = GridSize::new(2, 3).unwrap().columns();
        assert_eq!(xs, vec![1, 1, 1, 2, 2, 2]);
        assert_eq!(ys, vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        assert_eq!(GridSize::new(0, 3), Err(GridError::NonPositiveWidth(0)));
        assert_eq!(GridSize::new(3, -1), Err(GridError::NonPositiveHeight(-1)));
        assert!(matches!(
            GridSize::new(MAX_DIMENSION + 1, 1),
            Err(GridError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_same_size_is_unchanged() {
        let grid = GridSize::new(3, 3).unwrap();
        let plan = grid.plan_resize(GridSize::new(3, 3).unwrap());
        assert_eq!(plan, ResizePlan::Unchanged);

        let occupied = vec![(1, Cell::new(3, 3)), (2, Cell::new(1, 1))];
        let (kept, detached) = plan.partition(occupied.clone());
        assert_eq!(kept, occupied);
        assert!(detached.is_empty());
    }

    #[test]
    fn test_shrink_detaches_cells_outside_new_grid() {
        let plan = GridSize::new(3, 3)
            .unwrap()
            .plan_resize(GridSize::new(2, 2).unwrap());

        let occupied = vec![
            ("PROD-001", Cell::new(1, 1)),
            ("PROD-002", Cell::new(3, 1)),
            ("PROD-003", Cell::new(2, 3)),
            ("PROD-004", Cell::new(2, 2)),
        ];
        let (kept, detached) = plan.partition(occupied);

        let kept: Vec<&str> = kept.into_iter().map(|(code, _)| code).collect();
        let detached: Vec<&str> = detached.into_iter().map(|(code, _)| code).collect();
        assert_eq!(kept, vec!["PROD-001", "PROD-004"]);
        assert_eq!(detached, vec!["PROD-002", "PROD-003"]);
    }

    #[test]
    fn test_names() {
        let area = AreaName::parse("A").unwrap();
        let cell = Cell::new(1, 2);
        assert_eq!(cell.coordinate_name(area), "A-1-2");
        assert_eq!(cell.position_name(), "1-2");
    }
}
