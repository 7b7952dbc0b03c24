//! Grid footprints of placed 3D objects.
//!
//! The footprint is a coarse approximation: the four corners of the shape's
//! x/z bounding square are mapped to cells and deduplicated. The cells in
//! between are not rasterized, so an object spanning more than two cells per
//! axis under-covers its true footprint.

use nalgebra::Point3;

use crate::map::{Cell, CoordinateMapper};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width used for cubes created with a non-positive size.
const DEFAULT_CUBE_WIDTH: f32 = 1.0;
/// Radius used for spheres and cylinders created with a non-positive radius.
const DEFAULT_RADIUS: f32 = 0.5;

/// Horizontal shape of a placed object.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectShape {
    /// Box-like shape with a square x/z cross-section.
    Box {
        /// Half the edge length of the square.
        half_extent: f32,
    },
    /// Disc-like shape (sphere, cylinder) with a circular x/z cross-section.
    Disc {
        /// Radius of the circle.
        radius: f32,
    },
    /// Anything else; only the center cell is occupied.
    Other,
}

impl ObjectShape {
    /// Box shape for a cube of the given edge width.
    pub fn cube(width: f32) -> Self {
        let width = if width > 0.0 { width } else { DEFAULT_CUBE_WIDTH };
        ObjectShape::Box {
            half_extent: width / 2.0,
        }
    }

    /// Disc shape for a sphere of the given radius.
    pub fn sphere(radius: f32) -> Self {
        ObjectShape::Disc {
            radius: if radius > 0.0 { radius } else { DEFAULT_RADIUS },
        }
    }

    /// Disc shape for a cylinder, sized by its top radius.
    pub fn cylinder(radius_top: f32) -> Self {
        Self::sphere(radius_top)
    }

    /// Half-size of the sampled square, or `None` for center-only shapes.
    fn sample_half_size(&self) -> Option<f32> {
        match self {
            ObjectShape::Box { half_extent } => Some(*half_extent),
            ObjectShape::Disc { radius } => Some(*radius),
            ObjectShape::Other => None,
        }
    }
}

/// A region of world space occupied by an externally owned object.
pub trait OccupiedRegion {
    /// World position of the object's center.
    fn world_position(&self) -> Point3<f32>;
    /// Horizontal shape of the object.
    fn shape(&self) -> ObjectShape;
}

/// Plain position + shape pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedObject {
    /// World position of the object's center.
    pub position: Point3<f32>,
    /// Horizontal shape of the object.
    pub shape: ObjectShape,
}

impl PlacedObject {
    /// Creates a placed object.
    pub fn new(position: Point3<f32>, shape: ObjectShape) -> Self {
        Self { position, shape }
    }
}

impl OccupiedRegion for PlacedObject {
    fn world_position(&self) -> Point3<f32> {
        self.position
    }

    fn shape(&self) -> ObjectShape {
        self.shape
    }
}

/// Computes the cells occupied by an object at `position` with `shape`.
///
/// Returns the deduplicated corner cells in the order
/// `(-,-)`, `(-,+)`, `(+,-)`, `(+,+)` (first occurrence wins), or the single
/// center cell for [`ObjectShape::Other`].
pub fn footprint(position: &Point3<f32>, shape: &ObjectShape, mapper: &CoordinateMapper) -> Vec<Cell> {
    let Some(h) = shape.sample_half_size() else {
        return vec![mapper.world_to_grid(position.x, position.z)];
    };

    let corners = [
        (position.x - h, position.z - h),
        (position.x - h, position.z + h),
        (position.x + h, position.z - h),
        (position.x + h, position.z + h),
    ];

    let mut cells: Vec<Cell> = Vec::with_capacity(corners.len());
    for (x, z) in corners {
        let cell = mapper.world_to_grid(x, z);
        if !cells.contains(&cell) {
            cells.push(cell);
        }
    }
    cells
}

/// Computes the footprint of any [`OccupiedRegion`].
pub fn region_footprint(region: &impl OccupiedRegion, mapper: &CoordinateMapper) -> Vec<Cell> {
    footprint(&region.world_position(), &region.shape(), mapper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(&GridConfig::from_extent(20.0, 20).unwrap())
    }

    #[test]
    fn test_small_box_covers_one_cell() {
        let mapper = mapper();
        let center = mapper.grid_to_world(Cell::new(5, 5), 0.5);
        let cells = footprint(&center, &ObjectShape::cube(0.5), &mapper);
        assert_eq!(cells, vec![Cell::new(5, 5)]);
    }

    #[test]
    fn test_unit_cube_on_cell_center_spans_four_cells() {
        // Corners land exactly on cell borders and round away from the origin side
        let mapper = mapper();
        let center = mapper.grid_to_world(Cell::new(5, 5), 0.5);
        let cells = footprint(&center, &ObjectShape::cube(1.0), &mapper);
        assert_eq!(
            cells,
            vec![
                Cell::new(5, 5),
                Cell::new(5, 6),
                Cell::new(6, 5),
                Cell::new(6, 6)
            ]
        );
    }

    #[test]
    fn test_large_box_is_corner_sampled_only() {
        let mapper = mapper();
        let center = mapper.grid_to_world(Cell::new(10, 10), 0.0);
        let cells = footprint(&center, &ObjectShape::Box { half_extent: 2.0 }, &mapper);
        assert_eq!(
            cells,
            vec![
                Cell::new(8, 8),
                Cell::new(8, 12),
                Cell::new(12, 8),
                Cell::new(12, 12)
            ]
        );
        assert!(!cells.contains(&Cell::new(10, 10)));
    }

    #[test]
    fn test_disc_uses_radius() {
        let mapper = mapper();
        let center = mapper.grid_to_world(Cell::new(3, 3), 0.0);
        let cells = footprint(&center, &ObjectShape::cylinder(1.0), &mapper);
        assert_eq!(
            cells,
            vec![
                Cell::new(2, 2),
                Cell::new(2, 4),
                Cell::new(4, 2),
                Cell::new(4, 4)
            ]
        );
    }

    #[test]
    fn test_other_shape_uses_center() {
        let mapper = mapper();
        let object = PlacedObject::new(Point3::new(0.2, 1.0, -0.2), ObjectShape::Other);
        assert_eq!(region_footprint(&object, &mapper), vec![Cell::new(10, 9)]);
    }

    #[test]
    fn test_footprint_clamps_at_border() {
        let mapper = mapper();
        let center = mapper.grid_to_world(Cell::new(0, 0), 0.0);
        let cells = footprint(&center, &ObjectShape::Box { half_extent: 1.0 }, &mapper);
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 0),
                Cell::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_shape_defaults() {
        assert_eq!(ObjectShape::cube(0.0), ObjectShape::Box { half_extent: 0.5 });
        assert_eq!(ObjectShape::sphere(-1.0), ObjectShape::Disc { radius: 0.5 });
    }
}
