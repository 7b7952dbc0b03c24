//! Grid geometry configuration.
//!
//! A [`GridConfig`] fixes the number of cells along each axis and the world
//! size of a single (square) cell. The grid is always centered on the world
//! origin, so the world extent along x is `width * cell_size` and along z is
//! `height * cell_size`.

#![warn(missing_docs)]

use crate::error::GridError;
use crate::map::Cell;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest number of cells along one axis. Cell indices up to this bound stay
/// exact in `f32` world coordinates with enough margin for the round trip
/// through `world_to_grid`.
pub const MAX_CELLS_PER_AXIS: usize = 1 << 20;

/// Validated geometry of a grid.
///
/// Deserialized values go through [`GridConfig::new`] and are rejected the
/// same way.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGridConfig"))]
pub struct GridConfig {
    width: usize,
    height: usize,
    cell_size: f32,
}

impl GridConfig {
    /// Creates a new grid configuration.
    ///
    /// # Arguments
    /// * `width` - Number of cells along the world x axis.
    /// * `height` - Number of cells along the world z axis.
    /// * `cell_size` - World units per cell edge.
    ///
    /// # Returns
    /// * `Result<Self, GridError>` - The configuration, or an error if any
    ///   parameter would produce a degenerate grid.
    pub fn new(width: usize, height: usize, cell_size: f32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions(
                "Width and height must be non-zero",
            ));
        }
        if width > MAX_CELLS_PER_AXIS || height > MAX_CELLS_PER_AXIS {
            return Err(GridError::InvalidDimensions(
                "Grid dimensions too large for f32 world coordinates",
            ));
        }
        if width.checked_mul(height).is_none() {
            return Err(GridError::InvalidDimensions(
                "Grid dimensions too large, would cause overflow",
            ));
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(
                "Cell size must be positive and finite",
            ));
        }

        let config = Self {
            width,
            height,
            cell_size,
        };
        if !config.extent_x().is_finite() || !config.extent_z().is_finite() {
            return Err(GridError::InvalidCellSize(
                "Grid extent overflows f32",
            ));
        }
        Ok(config)
    }

    /// Creates a square grid from its total world extent and the number of
    /// divisions along each axis (`cell_size = extent / divisions`).
    pub fn from_extent(extent: f32, divisions: usize) -> Result<Self, GridError> {
        if !extent.is_finite() || extent <= 0.0 {
            return Err(GridError::InvalidCellSize(
                "Grid extent must be positive and finite",
            ));
        }
        if divisions == 0 {
            return Err(GridError::InvalidDimensions(
                "Division count must be non-zero",
            ));
        }
        Self::new(divisions, divisions, extent / divisions as f32)
    }

    /// Number of cells along x.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells along z.
    pub fn height(&self) -> usize {
        self.height
    }

    /// World units per cell edge.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World extent along x.
    pub fn extent_x(&self) -> f32 {
        self.width as f32 * self.cell_size
    }

    /// World extent along z.
    pub fn extent_z(&self) -> f32 {
        self.height as f32 * self.cell_size
    }

    /// Total number of cells in the grid.
    pub fn total_cells(&self) -> usize {
        self.width * self.height
    }

    /// Returns true if `cell` lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Checks that `cell` lies inside the grid.
    pub fn check_cell(&self, cell: Cell) -> Result<(), GridError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                cell,
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Unchecked field layout used to deserialize a [`GridConfig`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawGridConfig {
    width: usize,
    height: usize,
    cell_size: f32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGridConfig> for GridConfig {
    type Error = GridError;

    fn try_from(raw: RawGridConfig) -> Result<Self, Self::Error> {
        GridConfig::new(raw.width, raw.height, raw.cell_size)
    }
}

impl std::fmt::Display for GridConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} cells, cell size {:.3}",
            self.width, self.height, self.cell_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::CoordinateMapper;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_config_creation() {
        let config = GridConfig::new(10, 8, 0.5).unwrap();
        assert_eq!(config.width(), 10);
        assert_eq!(config.height(), 8);
        assert_eq!(config.total_cells(), 80);
        assert!((config.extent_x() - 5.0).abs() < EPSILON);
        assert!((config.extent_z() - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_from_extent() {
        let config = GridConfig::from_extent(20.0, 40).unwrap();
        assert_eq!(config.width(), 40);
        assert_eq!(config.height(), 40);
        assert!((config.cell_size() - 0.5).abs() < EPSILON);
        assert!((config.extent_x() - 20.0).abs() < EPSILON);
    }

    #[test]
    fn test_invalid_creation() {
        assert!(matches!(
            GridConfig::new(0, 10, 1.0),
            Err(GridError::InvalidDimensions(_))
        ));
        assert!(matches!(
            GridConfig::new(10, 0, 1.0),
            Err(GridError::InvalidDimensions(_))
        ));
        assert!(matches!(
            GridConfig::new(10, 10, 0.0),
            Err(GridError::InvalidCellSize(_))
        ));
        assert!(matches!(
            GridConfig::new(10, 10, -1.0),
            Err(GridError::InvalidCellSize(_))
        ));
        assert!(matches!(
            GridConfig::new(10, 10, f32::NAN),
            Err(GridError::InvalidCellSize(_))
        ));
        assert!(matches!(
            GridConfig::new(usize::MAX, 2, 1.0),
            Err(GridError::InvalidDimensions(_))
        ));
        assert!(matches!(
            GridConfig::new(40_000_000, 1, 1.0),
            Err(GridError::InvalidDimensions(_))
        ));
        assert!(matches!(
            GridConfig::new(1, MAX_CELLS_PER_AXIS + 1, 1.0),
            Err(GridError::InvalidDimensions(_))
        ));
        assert!(matches!(
            GridConfig::new(2, 2, f32::MAX),
            Err(GridError::InvalidCellSize(_))
        ));
        assert!(matches!(
            GridConfig::from_extent(20.0, 0),
            Err(GridError::InvalidDimensions(_))
        ));
        assert!(matches!(
            GridConfig::from_extent(-20.0, 10),
            Err(GridError::InvalidCellSize(_))
        ));
    }

    #[test]
    fn test_largest_grid_round_trips() {
        let config = GridConfig::new(MAX_CELLS_PER_AXIS, 1, 1.0).unwrap();
        let mapper = CoordinateMapper::new(&config);
        for x in [0, 1, MAX_CELLS_PER_AXIS / 2, MAX_CELLS_PER_AXIS - 2, MAX_CELLS_PER_AXIS - 1] {
            let cell = Cell::new(x, 0);
            let world = mapper.grid_to_world(cell, 0.0);
            assert!(world.x.is_finite());
            assert_eq!(mapper.world_to_grid(world.x, world.z), cell);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates() {
        let config: GridConfig = toml::from_str("width = 4\nheight = 3\ncell_size = 0.5").unwrap();
        assert_eq!(config, GridConfig::new(4, 3, 0.5).unwrap());

        let zero_width = toml::from_str::<GridConfig>("width = 0\nheight = 5\ncell_size = 1.0");
        assert!(zero_width.is_err());

        let negative_size = toml::from_str::<GridConfig>("width = 5\nheight = 5\ncell_size = -1.0");
        let err = negative_size.unwrap_err().to_string();
        assert!(err.contains("Invalid cell size"), "unexpected error: {}", err);
    }

    #[test]
    fn test_check_cell() {
        let config = GridConfig::new(5, 3, 1.0).unwrap();
        assert!(config.check_cell(Cell::new(4, 2)).is_ok());
        assert_eq!(
            config.check_cell(Cell::new(5, 0)),
            Err(GridError::OutOfBounds {
                cell: Cell::new(5, 0),
                width: 5,
                height: 3,
            })
        );
        assert!(!config.contains(Cell::new(0, 3)));
    }
}
