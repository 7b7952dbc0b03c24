//! Top-down projection of the world x/z plane onto the window.
//!
//! World x grows to the right and world z grows down the screen, with the
//! world origin at the window center.

use tilepath_grid::CoordinateMapper;

/// Screen margin kept around the grid, in pixels.
const MARGIN_PX: f32 = 24.0;
/// Height reserved at the top of the window for the status text.
const HUD_HEIGHT_PX: f32 = 64.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    center_x: f32,
    center_y: f32,
    pixels_per_unit: f32,
}

impl Viewport {
    /// Fits the whole grid into a `screen_w` x `screen_h` window, zooming at
    /// most to `max_pixels_per_unit`.
    pub fn fit(
        screen_w: f32,
        screen_h: f32,
        mapper: &CoordinateMapper,
        max_pixels_per_unit: f32,
    ) -> Self {
        let (extent_x, extent_z) = mapper.extent();
        let usable_w = (screen_w - 2.0 * MARGIN_PX).max(1.0);
        let usable_h = (screen_h - HUD_HEIGHT_PX - 2.0 * MARGIN_PX).max(1.0);

        let pixels_per_unit = (usable_w / extent_x)
            .min(usable_h / extent_z)
            .min(max_pixels_per_unit)
            .max(f32::EPSILON);

        Self {
            center_x: screen_w / 2.0,
            center_y: HUD_HEIGHT_PX + (screen_h - HUD_HEIGHT_PX) / 2.0,
            pixels_per_unit,
        }
    }

    pub fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    /// World x/z to screen pixels.
    pub fn world_to_screen(&self, x: f32, z: f32) -> (f32, f32) {
        (
            self.center_x + x * self.pixels_per_unit,
            self.center_y + z * self.pixels_per_unit,
        )
    }

    /// Screen pixels to world x/z.
    pub fn screen_to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        (
            (sx - self.center_x) / self.pixels_per_unit,
            (sy - self.center_y) / self.pixels_per_unit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilepath_grid::{Cell, GridConfig};

    const EPSILON: f32 = 1e-4;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(&GridConfig::from_extent(20.0, 20).unwrap())
    }

    #[test]
    fn test_fit_respects_zoom_cap_and_window() {
        let mapper = mapper();

        let roomy = Viewport::fit(2000.0, 2000.0, &mapper, 32.0);
        assert!((roomy.pixels_per_unit() - 32.0).abs() < EPSILON);

        let tight = Viewport::fit(800.0, 600.0, &mapper, 32.0);
        let expected = (600.0 - HUD_HEIGHT_PX - 2.0 * MARGIN_PX) / 20.0;
        assert!((tight.pixels_per_unit() - expected).abs() < EPSILON);
    }

    #[test]
    fn test_screen_round_trip_hits_clicked_cell() {
        let mapper = mapper();
        let viewport = Viewport::fit(800.0, 600.0, &mapper, 32.0);

        let cell = Cell::new(13, 4);
        let world = mapper.grid_to_world(cell, 0.0);
        let (sx, sy) = viewport.world_to_screen(world.x, world.z);
        let (x, z) = viewport.screen_to_world(sx, sy);

        assert!((x - world.x).abs() < EPSILON);
        assert!((z - world.z).abs() < EPSILON);
        assert_eq!(mapper.world_to_grid(x, z), cell);
    }
}
