/*

A* over an 8-connected grid.

    f(n) = g(n) + h(n)

    g(n) = accumulated step cost, 1 for orthogonal steps and sqrt(2) for diagonal ones
    h(n) = Euclidean distance from n to the goal (admissible and consistent for these costs)

A diagonal step is only taken when both orthogonal cells flanking it are walkable,
so a path never squeezes between two diagonally touching obstacles.

The open set is a binary heap ordered by lowest f, then lowest h, then earliest
insertion, which makes the returned path a pure function of the inputs.

*/

use crate::map::Cell;

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::f64::consts::SQRT_2;
use std::fmt;

use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The 8 neighbor offsets, clockwise starting from "up" (negative y).
const DIRECTIONS: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Represents the result of an A* pathfinding operation with metadata.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathResult {
    /// The computed path, if one was found.
    pub path: Option<Vec<Cell>>,
    /// The total cost of the path.
    pub total_cost: Option<f64>,
    /// The number of nodes expanded during the search.
    pub nodes_explored: usize,
    /// The length of the path (number of cells).
    pub path_length: usize,
}

impl PathResult {
    /// Creates a new PathResult for a successful path.
    pub fn success(path: Vec<Cell>, total_cost: f64, nodes_explored: usize) -> Self {
        let path_length = path.len();
        Self {
            path: Some(path),
            total_cost: Some(total_cost),
            nodes_explored,
            path_length,
        }
    }

    /// Creates a new PathResult for a failed path search.
    pub fn failure(nodes_explored: usize) -> Self {
        Self {
            path: None,
            total_cost: None,
            nodes_explored,
            path_length: 0,
        }
    }

    /// Returns true if a path was found.
    pub fn is_success(&self) -> bool {
        self.path.is_some()
    }

    /// Returns the path, or an empty sequence if none was found.
    pub fn into_path(self) -> Vec<Cell> {
        self.path.unwrap_or_default()
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(_) => write!(
                f,
                "PathResult {{ success: true, path_length: {}, total_cost: {:.3}, nodes_explored: {} }}",
                self.path_length,
                self.total_cost.unwrap_or(0.0),
                self.nodes_explored
            ),
            None => write!(
                f,
                "PathResult {{ success: false, nodes_explored: {} }}",
                self.nodes_explored
            ),
        }
    }
}

/// Calculates the Euclidean distance between two cells.
pub fn euclidean_distance(a: &Cell, b: &Cell) -> f64 {
    let dx = a.x.abs_diff(b.x) as f64;
    let dy = a.y.abs_diff(b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Cost of a single step between two adjacent cells.
pub fn step_cost(from: &Cell, to: &Cell) -> f64 {
    if from.is_diagonal_to(to) { SQRT_2 } else { 1.0 }
}

/// Bounds and obstacle lookups for one search.
struct SearchGrid<'a> {
    width: usize,
    height: usize,
    obstacles: &'a HashSet<Cell>,
}

impl SearchGrid<'_> {
    fn is_walkable(&self, cell: &Cell) -> bool {
        cell.x < self.width && cell.y < self.height && !self.obstacles.contains(cell)
    }

    fn walkable_offset(&self, cell: &Cell, dx: isize, dy: isize) -> Option<Cell> {
        cell.offset(dx, dy).filter(|c| self.is_walkable(c))
    }

    /// Gets the walkable neighbors of a cell, in `DIRECTIONS` order.
    fn neighbors(&self, cell: &Cell) -> Vec<Cell> {
        let mut neighbors_vec = Vec::with_capacity(DIRECTIONS.len());

        for (dx, dy) in DIRECTIONS {
            let Some(neighbor) = self.walkable_offset(cell, dx, dy) else {
                continue;
            };

            if dx != 0 && dy != 0 {
                // No corner cutting: both flanking orthogonal cells must be open
                let horizontal = self.walkable_offset(cell, dx, 0);
                let vertical = self.walkable_offset(cell, 0, dy);
                if horizontal.is_none() || vertical.is_none() {
                    continue;
                }
            }

            neighbors_vec.push(neighbor);
        }

        neighbors_vec
    }
}

#[derive(Copy, Clone, Debug)]
struct State {
    f: f64,
    h: f64,
    seq: u64,
    position: Cell,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: every comparison is flipped so the
        // lowest f (then lowest h, then oldest entry) is popped first.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

/// Reconstructs the path from a map of `came_from` links.
fn reconstruct_path(came_from: &HashMap<Cell, Cell>, mut current: Cell) -> Vec<Cell> {
    let mut path = vec![current];
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Finds a path between two cells using the A* algorithm.
///
/// # Arguments
/// * `start` - Starting cell.
/// * `end` - Goal cell.
/// * `width` - Grid width in cells.
/// * `height` - Grid height in cells.
/// * `obstacles` - Blocked cells.
///
/// # Returns
/// * `Vec<Cell>` - The path from `start` to `end` inclusive, or an empty
///   sequence if either endpoint is blocked or out of bounds, or no route exists.
pub fn find_path(
    start: Cell,
    end: Cell,
    width: usize,
    height: usize,
    obstacles: &HashSet<Cell>,
) -> Vec<Cell> {
    find_path_detailed(start, end, width, height, obstacles).into_path()
}

/// Finds a path between two cells using the A* algorithm with detailed results.
///
/// Same contract as [`find_path`], additionally reporting the total path cost
/// and the number of expanded nodes.
pub fn find_path_detailed(
    start: Cell,
    end: Cell,
    width: usize,
    height: usize,
    obstacles: &HashSet<Cell>,
) -> PathResult {
    let grid = SearchGrid {
        width,
        height,
        obstacles,
    };
    let mut nodes_explored = 0;

    if !grid.is_walkable(&start) || !grid.is_walkable(&end) {
        debug!(%start, %end, "Start or end cell is blocked or out of bounds");
        return PathResult::failure(nodes_explored);
    }

    let mut open_set = BinaryHeap::new();
    let mut closed_set: HashSet<Cell> = HashSet::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut g_score: HashMap<Cell, f64> = HashMap::new();
    let mut seq: u64 = 0;

    let h = euclidean_distance(&start, &end);
    g_score.insert(start, 0.0);
    open_set.push(State {
        f: h,
        h,
        seq,
        position: start,
    });

    while let Some(State {
        position: current, ..
    }) = open_set.pop()
    {
        // Stale heap entries for already finalized cells are skipped
        if !closed_set.insert(current) {
            continue;
        }
        nodes_explored += 1;

        let current_g = g_score.get(&current).copied().unwrap_or(0.0);

        if current == end {
            let path = reconstruct_path(&came_from, current);
            debug!(
                %start,
                %end,
                path_length = path.len(),
                total_cost = current_g,
                nodes_explored,
                "Path found"
            );
            return PathResult::success(path, current_g, nodes_explored);
        }

        for neighbor in grid.neighbors(&current) {
            if closed_set.contains(&neighbor) {
                continue;
            }

            let tentative_g_score = current_g + step_cost(&current, &neighbor);
            if tentative_g_score < g_score.get(&neighbor).copied().unwrap_or(f64::INFINITY) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative_g_score);

                let h = euclidean_distance(&neighbor, &end);
                seq += 1;
                trace!(%neighbor, g = tentative_g_score, h, "Open set push");
                open_set.push(State {
                    f: tentative_g_score + h,
                    h,
                    seq,
                    position: neighbor,
                });
            }
        }
    }

    debug!(%start, %end, nodes_explored, "No path found");
    PathResult::failure(nodes_explored)
}
