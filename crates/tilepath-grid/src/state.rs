//! Incremental grid state: start/end cells, obstacles, object footprints and
//! the current path.
//!
//! Every mutation runs to completion before returning, including the path
//! recomputation it triggers, so the accessors never observe a stale path.
//! Mutations that would break an invariant (out-of-bounds cell, start or end
//! placed on an obstacle, obstacle placed on start or end, start placed on
//! end) are rejected without any state change.

use std::collections::{BTreeMap, HashMap, HashSet};

use nalgebra::Point3;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::astar;
use crate::config::GridConfig;
use crate::error::GridError;
use crate::footprint::{self, OccupiedRegion};
use crate::map::{Cell, CoordinateMapper, TileStatus};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque identifier of an object owned by the rendering layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectHandle(pub u64);

impl From<u64> for ObjectHandle {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owned copy of everything a renderer needs to draw the grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridSnapshot {
    /// Every cell whose status is not `Default`.
    pub tiles: BTreeMap<Cell, TileStatus>,
    /// Current path from start to end, empty if there is none.
    pub path: Vec<Cell>,
    /// Start cell, if assigned.
    pub start: Option<Cell>,
    /// End cell, if assigned.
    pub end: Option<Cell>,
    /// Obstacle cells, sorted.
    pub obstacles: Vec<Cell>,
}

/// Consumer of tile-status and path updates.
pub trait TileSink {
    /// Called with the current state each time it is published.
    fn refresh(&mut self, snapshot: &GridSnapshot);
}

/// Stateful grid: owns tile statuses, start/end cells, the obstacle set, the
/// custom-object registry and the current path.
#[derive(Debug, Clone)]
pub struct GridState {
    config: GridConfig,
    mapper: CoordinateMapper,
    tile_status: BTreeMap<Cell, TileStatus>,
    start: Option<Cell>,
    end: Option<Cell>,
    obstacles: HashSet<Cell>,
    custom_objects: HashMap<ObjectHandle, Vec<Cell>>,
    path: Vec<Cell>,
}

impl GridState {
    /// Creates a grid and assigns a uniformly random start cell.
    pub fn new(config: GridConfig) -> Self {
        Self::with_rng(config, &mut rand::rng())
    }

    /// Creates a grid, drawing the random start cell from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(config: GridConfig, rng: &mut R) -> Self {
        let mut state = Self::empty(config);
        state.initialize_random_start_with(rng);
        info!(%config, start = ?state.start, "Grid state created");
        state
    }

    /// Creates a grid with no start cell assigned.
    pub fn empty(config: GridConfig) -> Self {
        Self {
            config,
            mapper: CoordinateMapper::new(&config),
            tile_status: BTreeMap::new(),
            start: None,
            end: None,
            obstacles: HashSet::new(),
            custom_objects: HashMap::new(),
            path: Vec::new(),
        }
    }

    /// Replaces the grid geometry. All state is reset and a new random start
    /// is assigned.
    pub fn reconfigure(&mut self, config: GridConfig) {
        info!(old = %self.config, new = %config, "Reconfiguring grid, state is reset");
        *self = Self::empty(config);
        self.initialize_random_start();
    }

    /// Gets the grid geometry.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Gets the coordinate mapper for this grid.
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Returns true once a start cell has been assigned.
    pub fn is_initialized(&self) -> bool {
        self.start.is_some()
    }

    /// Picks a uniformly random cell and makes it the start.
    pub fn initialize_random_start(&mut self) {
        self.initialize_random_start_with(&mut rand::rng());
    }

    /// Same as [`initialize_random_start`](Self::initialize_random_start),
    /// drawing from `rng`.
    pub fn initialize_random_start_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let cell = Cell::new(
            rng.random_range(0..self.config.width()),
            rng.random_range(0..self.config.height()),
        );
        self.set_start(cell);
    }

    /// Moves the start to `cell` and recomputes the path if an end is set.
    ///
    /// Rejected if `cell` is out of bounds, is the end cell, or is an obstacle.
    pub fn set_start(&mut self, cell: Cell) {
        if let Err(reason) = self.check_endpoint(cell, self.end) {
            debug!(%cell, %reason, "Start placement rejected");
            return;
        }

        if let Some(old) = self.start.replace(cell) {
            self.clear_status(old, TileStatus::Start);
        }
        self.tile_status.insert(cell, TileStatus::Start);
        debug!(%cell, "Start set");

        if self.end.is_some() {
            self.recompute_path();
        }
    }

    /// Moves the end to `cell` and recomputes the path.
    ///
    /// Rejected if `cell` is out of bounds, is the start cell, or is an
    /// obstacle.
    pub fn set_end(&mut self, cell: Cell) {
        if let Err(reason) = self.check_endpoint(cell, self.start) {
            debug!(%cell, %reason, "End placement rejected");
            return;
        }

        if let Some(old) = self.end.replace(cell) {
            self.clear_status(old, TileStatus::End);
        }
        self.tile_status.insert(cell, TileStatus::End);
        debug!(%cell, "End set");

        self.recompute_path();
    }

    /// Marks `cell` as an obstacle.
    ///
    /// No-op if `cell` is out of bounds, already an obstacle, or the start or
    /// end cell.
    pub fn add_obstacle(&mut self, cell: Cell) {
        if let Err(err) = self.config.check_cell(cell) {
            debug!(reason = %err, "Obstacle placement rejected");
            return;
        }
        if self.obstacles.contains(&cell) || self.is_endpoint(cell) {
            return;
        }

        self.obstacles.insert(cell);
        self.tile_status.insert(cell, TileStatus::Obstacle);
        debug!(%cell, "Obstacle added");

        if self.start.is_some() && self.end.is_some() {
            self.recompute_path();
        }
    }

    /// Removes the obstacle at `cell`; no-op if there is none.
    pub fn remove_obstacle(&mut self, cell: Cell) {
        if !self.obstacles.remove(&cell) {
            return;
        }

        self.tile_status.remove(&cell);
        debug!(%cell, "Obstacle removed");

        self.recompute_path();
    }

    /// Adds or removes the obstacle at `cell` depending on its current state.
    pub fn toggle_obstacle(&mut self, cell: Cell) {
        if self.obstacles.contains(&cell) {
            self.remove_obstacle(cell);
        } else {
            self.add_obstacle(cell);
        }
    }

    /// Recomputes the path from scratch and refreshes the `Path` tiles.
    pub fn recompute_path(&mut self) {
        self.clear_path_tiles();

        let (Some(start), Some(end)) = (self.start, self.end) else {
            self.path.clear();
            return;
        };

        let result = astar::find_path_detailed(
            start,
            end,
            self.config.width(),
            self.config.height(),
            &self.obstacles,
        );
        debug!(%start, %end, %result, "Path recomputed");
        self.path = result.into_path();

        self.tile_status.insert(start, TileStatus::Start);
        self.tile_status.insert(end, TileStatus::End);
        for &cell in &self.path {
            if cell != start && cell != end {
                self.tile_status.insert(cell, TileStatus::Path);
            }
        }
    }

    /// Clears the path and removes the end cell.
    pub fn clear_path(&mut self) {
        self.clear_path_tiles();
        if let Some(end) = self.end.take() {
            self.clear_status(end, TileStatus::End);
        }
        self.path.clear();
        debug!("Path cleared");
    }

    /// Clears obstacles, the end cell and the path, keeping only the start.
    ///
    /// Registered custom objects stay registered but their obstacle cells are
    /// cleared along with every other obstacle.
    pub fn clear_all(&mut self) {
        self.tile_status.clear();
        self.obstacles.clear();
        self.end = None;
        self.path.clear();

        match self.start {
            Some(start) => {
                self.tile_status.insert(start, TileStatus::Start);
            }
            None => self.initialize_random_start(),
        }
        info!(start = ?self.start, "Grid cleared");
    }

    /// Registers `handle` as occupying `footprint`, marking those cells as
    /// obstacles when `mark_as_obstacle` is set.
    ///
    /// A handle that is already registered is rejected.
    pub fn add_custom_object(
        &mut self,
        handle: ObjectHandle,
        footprint: Vec<Cell>,
        mark_as_obstacle: bool,
    ) {
        if self.custom_objects.contains_key(&handle) {
            warn!(%handle, "Custom object already registered");
            return;
        }

        if mark_as_obstacle {
            for &cell in &footprint {
                self.add_obstacle(cell);
            }
        }
        debug!(%handle, cells = footprint.len(), mark_as_obstacle, "Custom object added");
        self.custom_objects.insert(handle, footprint);
    }

    /// Computes the footprint of `region` and registers it under `handle`.
    pub fn add_placed_object(
        &mut self,
        handle: ObjectHandle,
        region: &impl OccupiedRegion,
        mark_as_obstacle: bool,
    ) {
        let cells = self.calculate_object_footprint(region);
        self.add_custom_object(handle, cells, mark_as_obstacle);
    }

    /// Unregisters `handle`, removing the obstacles on its footprint when
    /// `clear_obstacles` is set.
    pub fn remove_custom_object(&mut self, handle: ObjectHandle, clear_obstacles: bool) {
        let Some(cells) = self.custom_objects.remove(&handle) else {
            debug!(%handle, "Unknown custom object");
            return;
        };

        if clear_obstacles {
            for cell in cells {
                self.remove_obstacle(cell);
            }
        }
        debug!(%handle, clear_obstacles, "Custom object removed");
    }

    /// Computes the cells occupied by `region` on this grid.
    pub fn calculate_object_footprint(&self, region: &impl OccupiedRegion) -> Vec<Cell> {
        footprint::region_footprint(region, &self.mapper)
    }

    /// Gets the registered object handles, sorted.
    pub fn custom_objects(&self) -> Vec<ObjectHandle> {
        let mut handles: Vec<ObjectHandle> = self.custom_objects.keys().copied().collect();
        handles.sort();
        handles
    }

    /// Gets the footprint registered for `handle`.
    pub fn custom_object_footprint(&self, handle: ObjectHandle) -> Option<Vec<Cell>> {
        self.custom_objects.get(&handle).cloned()
    }

    /// Gets the status of `cell`.
    pub fn tile_status(&self, cell: Cell) -> TileStatus {
        self.tile_status.get(&cell).copied().unwrap_or_default()
    }

    /// Gets every non-default tile status.
    pub fn all_tile_status(&self) -> BTreeMap<Cell, TileStatus> {
        self.tile_status.clone()
    }

    /// Gets the current path.
    pub fn path(&self) -> Vec<Cell> {
        self.path.clone()
    }

    /// Gets the current path as world positions at `height`.
    pub fn path_world(&self, height: f32) -> Vec<Point3<f32>> {
        self.path
            .iter()
            .map(|&cell| self.mapper.grid_to_world(cell, height))
            .collect()
    }

    /// Gets the start cell.
    pub fn start_cell(&self) -> Option<Cell> {
        self.start
    }

    /// Gets the end cell.
    pub fn end_cell(&self) -> Option<Cell> {
        self.end
    }

    /// Gets the obstacle cells, sorted.
    pub fn obstacles(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.obstacles.iter().copied().collect();
        cells.sort();
        cells
    }

    /// Converts a cell to the world position of its center.
    pub fn grid_to_world_position(&self, cell: Cell, height: f32) -> Point3<f32> {
        self.mapper.grid_to_world(cell, height)
    }

    /// Converts a world x/z position to the nearest cell.
    pub fn world_to_grid_position(&self, x: f32, z: f32) -> Cell {
        self.mapper.world_to_grid(x, z)
    }

    /// Gets an owned copy of the renderable state.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            tiles: self.all_tile_status(),
            path: self.path(),
            start: self.start,
            end: self.end,
            obstacles: self.obstacles(),
        }
    }

    /// Sends the current state to `sink`.
    pub fn publish(&self, sink: &mut impl TileSink) {
        sink.refresh(&self.snapshot());
    }

    fn is_endpoint(&self, cell: Cell) -> bool {
        self.start == Some(cell) || self.end == Some(cell)
    }

    /// Validates a start/end placement against bounds, obstacles and the
    /// opposite endpoint.
    fn check_endpoint(&self, cell: Cell, other: Option<Cell>) -> Result<(), GridError> {
        self.config.check_cell(cell)?;
        if other == Some(cell) {
            return Err(GridError::EndpointConflict(cell));
        }
        if self.obstacles.contains(&cell) {
            return Err(GridError::CellBlocked(cell));
        }
        Ok(())
    }

    /// Removes `cell`'s status if it currently is `status`.
    fn clear_status(&mut self, cell: Cell, status: TileStatus) {
        if self.tile_status.get(&cell) == Some(&status) {
            self.tile_status.remove(&cell);
        }
    }

    fn clear_path_tiles(&mut self) {
        self.tile_status.retain(|_, status| *status != TileStatus::Path);
    }
}
