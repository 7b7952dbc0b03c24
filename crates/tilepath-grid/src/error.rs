//! This module defines the error types used by the `tilepath-grid` crate.

#![warn(missing_docs)]

use thiserror::Error;

use crate::map::Cell;

/// Error type for grid operations.
///
/// This enum encapsulates all possible errors that can occur while building a
/// grid configuration or addressing cells in it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GridError {
    /// Error for invalid grid dimensions.
    /// This variant is returned when the grid width or height is zero, exceeds
    /// the per-axis limit, or when the total cell count would overflow.
    #[error("Invalid grid dimensions: {0}")]
    InvalidDimensions(&'static str),
    /// Error for invalid cell size.
    /// This variant is returned when a cell size (or grid extent) is not a
    /// positive, finite number, or when the grid extent overflows.
    #[error("Invalid cell size: {0}")]
    InvalidCellSize(&'static str),
    /// Error for out-of-bounds access.
    /// This variant is returned when a cell lies outside `[0, width) x [0, height)`.
    #[error("Cell {cell} is out of bounds for a {width}x{height} grid")]
    OutOfBounds {
        /// The offending cell.
        cell: Cell,
        /// Grid width in cells.
        width: usize,
        /// Grid height in cells.
        height: usize,
    },
    /// Error for placing a start or end cell on the opposite endpoint.
    #[error("Cell {0} is already the opposite endpoint")]
    EndpointConflict(Cell),
    /// Error for placing a start or end cell on an obstacle.
    #[error("Cell {0} is an obstacle")]
    CellBlocked(Cell),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::OutOfBounds {
            cell: Cell::new(12, 3),
            width: 10,
            height: 10,
        };
        assert_eq!(
            err.to_string(),
            "Cell (12, 3) is out of bounds for a 10x10 grid"
        );

        assert_eq!(
            GridError::CellBlocked(Cell::new(2, 4)).to_string(),
            "Cell (2, 4) is an obstacle"
        );

        let err = GridError::InvalidCellSize("must be positive");
        assert!(err.to_string().contains("Invalid cell size"));
    }
}
