//! Conversion between grid cells and world-space positions.
//!
//! The grid lies in the world x/z plane, centered on the origin. Cell `(0, 0)`
//! is the cell with the most negative x and z; the world position of a cell is
//! its center.

#![warn(missing_docs)]

use nalgebra::{Point2, Point3};

use crate::config::GridConfig;
use crate::map::Cell;

/// Bidirectional mapping between cells and world positions for one grid
/// geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    width: usize,
    height: usize,
    cell_size: f32,
}

impl CoordinateMapper {
    /// Creates a mapper for the given grid geometry.
    pub fn new(config: &GridConfig) -> Self {
        Self {
            width: config.width(),
            height: config.height(),
            cell_size: config.cell_size(),
        }
    }

    /// Gets the world extent of the grid along x and z.
    pub fn extent(&self) -> (f32, f32) {
        (
            self.width as f32 * self.cell_size,
            self.height as f32 * self.cell_size,
        )
    }

    /// Converts grid coordinates to the world position of the cell center.
    ///
    /// `height` becomes the vertical (y) coordinate. The formula is applied
    /// as-is to cells outside the grid.
    pub fn grid_to_world(&self, cell: Cell, height: f32) -> Point3<f32> {
        let (extent_x, extent_z) = self.extent();
        let half_cell = self.cell_size / 2.0;

        Point3::new(
            -extent_x / 2.0 + half_cell + cell.x as f32 * self.cell_size,
            height,
            -extent_z / 2.0 + half_cell + cell.y as f32 * self.cell_size,
        )
    }

    /// Converts a world x/z position to the nearest cell.
    ///
    /// Indices are rounded to the nearest cell center, then clamped into the
    /// grid, so positions outside the grid map to the closest border cell.
    pub fn world_to_grid(&self, x: f32, z: f32) -> Cell {
        let (extent_x, extent_z) = self.extent();
        let half_cell = self.cell_size / 2.0;

        let grid_x = (x + extent_x / 2.0 - half_cell) / self.cell_size;
        let grid_z = (z + extent_z / 2.0 - half_cell) / self.cell_size;

        Cell::new(
            clamp_index(grid_x, self.width),
            clamp_index(grid_z, self.height),
        )
    }

    /// Gets the world-space corners of the grid as `(min, max)` x/z points.
    pub fn world_bounds(&self) -> (Point2<f32>, Point2<f32>) {
        let (extent_x, extent_z) = self.extent();
        (
            Point2::new(-extent_x / 2.0, -extent_z / 2.0),
            Point2::new(extent_x / 2.0, extent_z / 2.0),
        )
    }

    /// Returns true if the world x/z position lies on the grid.
    pub fn contains_world(&self, x: f32, z: f32) -> bool {
        let (min, max) = self.world_bounds();
        x >= min.x && x < max.x && z >= min.y && z < max.y
    }
}

/// Rounds a fractional index and clamps it into `[0, len - 1]`.
fn clamp_index(index: f32, len: usize) -> usize {
    let rounded = index.round();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else {
        (rounded as usize).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn mapper(width: usize, height: usize, cell_size: f32) -> CoordinateMapper {
        CoordinateMapper::new(&GridConfig::new(width, height, cell_size).unwrap())
    }

    #[test]
    fn test_grid_to_world_is_centered() {
        let mapper = mapper(20, 20, 1.0);

        let corner = mapper.grid_to_world(Cell::new(0, 0), 0.0);
        assert!((corner.x - (-9.5)).abs() < EPSILON);
        assert!((corner.z - (-9.5)).abs() < EPSILON);

        let far = mapper.grid_to_world(Cell::new(19, 19), 2.0);
        assert!((far.x - 9.5).abs() < EPSILON);
        assert!((far.y - 2.0).abs() < EPSILON);
        assert!((far.z - 9.5).abs() < EPSILON);
    }

    #[test]
    fn test_world_to_grid_rounds_and_clamps() {
        let mapper = mapper(20, 20, 1.0);

        assert_eq!(mapper.world_to_grid(0.1, -0.1), Cell::new(10, 9));
        assert_eq!(mapper.world_to_grid(-9.4, 9.4), Cell::new(0, 19));
        assert_eq!(mapper.world_to_grid(-100.0, 100.0), Cell::new(0, 19));
        assert_eq!(mapper.world_to_grid(f32::NAN, 0.6), Cell::new(0, 10));
    }

    #[test]
    fn test_round_trip_every_cell() {
        for (width, height, cell_size) in [(20, 20, 1.0), (7, 13, 0.37), (40, 3, 2.5)] {
            let mapper = mapper(width, height, cell_size);
            for x in 0..width {
                for y in 0..height {
                    let cell = Cell::new(x, y);
                    let world = mapper.grid_to_world(cell, 0.0);
                    assert_eq!(mapper.world_to_grid(world.x, world.z), cell);
                }
            }
        }
    }

    #[test]
    fn test_world_bounds() {
        let mapper = mapper(10, 4, 0.5);
        let (min, max) = mapper.world_bounds();
        assert!((min.x - (-2.5)).abs() < EPSILON);
        assert!((min.y - (-1.0)).abs() < EPSILON);
        assert!((max.x - 2.5).abs() < EPSILON);
        assert!((max.y - 1.0).abs() < EPSILON);

        assert!(mapper.contains_world(0.0, 0.0));
        assert!(!mapper.contains_world(2.5, 0.0));
        assert!(!mapper.contains_world(0.0, -1.2));
    }
}
