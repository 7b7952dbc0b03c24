#![warn(missing_docs)]
#![doc = "Grid pathfinding core."]
#![doc = ""]
#![doc = "This crate provides A* search over an 8-connected grid with corner-cutting prevention,"]
#![doc = "conversion between grid cells and world positions for a grid centered on the origin,"]
#![doc = "coarse footprints for placed 3D objects, and an incremental state machine that keeps"]
#![doc = "tile statuses and the current path in sync with start, end and obstacle changes."]

pub mod astar;
pub mod config;
pub mod error;
pub mod footprint;
pub mod map;
pub mod state;

pub use astar::{PathResult, find_path, find_path_detailed};
pub use config::GridConfig;
pub use error::GridError;
pub use footprint::{ObjectShape, OccupiedRegion, PlacedObject, footprint};
pub use map::{Cell, CoordinateMapper, TileStatus};
pub use state::{GridSnapshot, GridState, ObjectHandle, TileSink};
