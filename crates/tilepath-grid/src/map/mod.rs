//! Map-related functionality for the grid.
//!
//! This module provides the cell and tile-status value types and the
//! conversion between grid cells and world-space positions.

pub mod cell;
pub mod coordinates;

pub use cell::{Cell, TileStatus};
pub use coordinates::CoordinateMapper;
