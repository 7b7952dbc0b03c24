//! Cell coordinates and per-cell tile status.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A cell of the grid, addressed by column (`x`) and row (`y`).
///
/// Cells are plain values: they are compared, hashed and ordered by their
/// coordinates (`x` first, then `y`).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    /// The x-coordinate (column index) in the grid.
    pub x: usize,
    /// The y-coordinate (row index) in the grid.
    pub y: usize,
}

impl Cell {
    /// Creates a new `Cell`.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the cell offset by `(dx, dy)`, or `None` if either coordinate
    /// would become negative.
    pub fn offset(&self, dx: isize, dy: isize) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    /// Returns true if `other` is one of the 8 cells surrounding `self`.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
    }

    /// Returns true if moving from `self` to `other` is a diagonal step.
    pub fn is_diagonal_to(&self, other: &Cell) -> bool {
        self.x.abs_diff(other.x) == 1 && self.y.abs_diff(other.y) == 1
    }
}

impl From<(usize, usize)> for Cell {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rendering-relevant classification of a cell.
///
/// A cell carries exactly one status at a time; cells absent from a status map
/// are [`TileStatus::Default`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TileStatus {
    /// Plain walkable cell.
    #[default]
    Default,
    /// The route origin.
    Start,
    /// The route destination.
    End,
    /// An intermediate cell of the current path.
    Path,
    /// A blocked cell.
    Obstacle,
}

impl std::fmt::Display for TileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileStatus::Default => write!(f, "Default"),
            TileStatus::Start => write!(f, "Start"),
            TileStatus::End => write!(f, "End"),
            TileStatus::Path => write!(f, "Path"),
            TileStatus::Obstacle => write!(f, "Obstacle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let cell = Cell::new(0, 3);
        assert_eq!(cell.offset(1, -1), Some(Cell::new(1, 2)));
        assert_eq!(cell.offset(-1, 0), None);
    }

    #[test]
    fn test_adjacency() {
        let cell = Cell::new(2, 2);
        assert!(cell.is_adjacent(&Cell::new(3, 3)));
        assert!(cell.is_adjacent(&Cell::new(2, 1)));
        assert!(!cell.is_adjacent(&cell));
        assert!(!cell.is_adjacent(&Cell::new(4, 2)));

        assert!(cell.is_diagonal_to(&Cell::new(1, 3)));
        assert!(!cell.is_diagonal_to(&Cell::new(1, 2)));
    }

    #[test]
    fn test_ordering_is_by_x_then_y() {
        let mut cells = vec![Cell::new(1, 0), Cell::new(0, 5), Cell::new(0, 1)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(0, 1), Cell::new(0, 5), Cell::new(1, 0)]);
    }

    #[test]
    fn test_tile_status_default() {
        assert_eq!(TileStatus::default(), TileStatus::Default);
        assert_eq!(TileStatus::Obstacle.to_string(), "Obstacle");
    }
}
