use macroquad::prelude::*;
use tracing::{debug, info};

use tilepath_grid::{
    Cell, GridSnapshot, GridState, ObjectHandle, ObjectShape, PlacedObject, TileSink, TileStatus,
};

use crate::settings::{ColorSettings, ViewSettings};
use crate::viewport::Viewport;

// Function to configure the macroquad window
pub fn window_conf() -> Conf {
    Conf {
        window_title: "Tilepath Grid Visualization".to_string(),
        window_width: 900,
        window_height: 800,
        high_dpi: true,
        ..Default::default()
    }
}

const BACKGROUND: Color = Color::new(0.80, 0.80, 0.80, 1.0);
const GROUND: Color = Color::new(0.60, 0.60, 0.60, 1.0);
const HOVER_ALPHA: f32 = 0.35;
const OBJECT_OUTLINE: Color = Color::new(0.95, 0.95, 0.95, 1.0);

/// Height at which placed objects sit, in world units.
const OBJECT_HEIGHT: f32 = 0.5;

/// Keeps the last published grid state for drawing.
#[derive(Default)]
struct GridRenderer {
    snapshot: Option<GridSnapshot>,
}

impl TileSink for GridRenderer {
    fn refresh(&mut self, snapshot: &GridSnapshot) {
        self.snapshot = Some(snapshot.clone());
    }
}

fn tile_color(status: TileStatus, colors: &ColorSettings) -> Color {
    let color = match status {
        TileStatus::Default => colors.base,
        TileStatus::Start => colors.start,
        TileStatus::End => colors.end,
        TileStatus::Path => colors.path,
        TileStatus::Obstacle => colors.obstacle,
    };
    color.0
}

/// Objects placed through the keyboard. The visualizer owns them; the grid
/// state only knows their handles and footprints.
#[derive(Default)]
struct Placements {
    next_id: u64,
    placed: Vec<(ObjectHandle, PlacedObject)>,
}

impl Placements {
    fn place(&mut self, state: &mut GridState, cell: Cell, shape: ObjectShape) {
        self.next_id += 1;
        let handle = ObjectHandle(self.next_id);
        let object = PlacedObject::new(state.grid_to_world_position(cell, OBJECT_HEIGHT), shape);

        state.add_placed_object(handle, &object, true);
        info!(%handle, %cell, ?shape, "Object placed");
        self.placed.push((handle, object));
    }

    fn remove_last(&mut self, state: &mut GridState) {
        if let Some((handle, _)) = self.placed.pop() {
            state.remove_custom_object(handle, true);
            info!(%handle, "Object removed");
        }
    }
}

/// Applies this frame's mouse and keyboard input to `state`.
///
/// Returns true if anything was dispatched.
fn handle_input(state: &mut GridState, placements: &mut Placements, hovered: Option<Cell>) -> bool {
    let mut dispatched = false;

    if let Some(cell) = hovered {
        if is_mouse_button_pressed(MouseButton::Left) {
            if is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift) {
                state.set_start(cell);
            } else {
                state.set_end(cell);
            }
            dispatched = true;
        }
        if is_mouse_button_pressed(MouseButton::Right) {
            state.toggle_obstacle(cell);
            dispatched = true;
        }
        if is_key_pressed(KeyCode::B) {
            placements.place(state, cell, ObjectShape::cube(1.0));
            dispatched = true;
        }
        if is_key_pressed(KeyCode::O) {
            placements.place(state, cell, ObjectShape::cylinder(0.5));
            dispatched = true;
        }
    }

    if is_key_pressed(KeyCode::X) {
        placements.remove_last(state);
        dispatched = true;
    }
    if is_key_pressed(KeyCode::P) {
        state.clear_path();
        dispatched = true;
    }
    if is_key_pressed(KeyCode::C) {
        state.clear_all();
        dispatched = true;
    }
    if is_key_pressed(KeyCode::R) {
        state.initialize_random_start();
        dispatched = true;
    }

    dispatched
}

fn draw_grid(state: &GridState, snapshot: &GridSnapshot, viewport: &Viewport, view: &ViewSettings, hovered: Option<Cell>) {
    let colors = &view.colors;
    let hover = Color {
        a: HOVER_ALPHA,
        ..colors.hover.0
    };
    let mapper = state.mapper();
    let config = state.config();
    let ppu = viewport.pixels_per_unit();

    let (min, max) = mapper.world_bounds();
    let (gx, gy) = viewport.world_to_screen(min.x, min.y);
    draw_rectangle(gx, gy, (max.x - min.x) * ppu, (max.y - min.y) * ppu, GROUND);

    let tile_px = config.cell_size() * view.tile_scale * ppu;
    for x in 0..config.width() {
        for y in 0..config.height() {
            let cell = Cell::new(x, y);
            let center = mapper.grid_to_world(cell, 0.0);
            let (sx, sy) = viewport.world_to_screen(center.x, center.z);
            let status = snapshot.tiles.get(&cell).copied().unwrap_or_default();

            draw_rectangle(sx - tile_px / 2.0, sy - tile_px / 2.0, tile_px, tile_px, tile_color(status, colors));
            if hovered == Some(cell) {
                draw_rectangle(sx - tile_px / 2.0, sy - tile_px / 2.0, tile_px, tile_px, hover);
            }
        }
    }

    // Connecting line through the cell centers
    let line: Vec<(f32, f32)> = state
        .path_world(0.0)
        .iter()
        .map(|p| viewport.world_to_screen(p.x, p.z))
        .collect();
    for pair in line.windows(2) {
        draw_line(pair[0].0, pair[0].1, pair[1].0, pair[1].1, 3.0, colors.path.0);
    }
}

fn draw_objects(placements: &Placements, viewport: &Viewport) {
    let ppu = viewport.pixels_per_unit();
    for (_, object) in &placements.placed {
        let (sx, sy) = viewport.world_to_screen(object.position.x, object.position.z);
        match object.shape {
            ObjectShape::Box { half_extent } => {
                let size = 2.0 * half_extent * ppu;
                draw_rectangle_lines(sx - size / 2.0, sy - size / 2.0, size, size, 2.0, OBJECT_OUTLINE);
            }
            ObjectShape::Disc { radius } => {
                draw_circle_lines(sx, sy, radius * ppu, 2.0, OBJECT_OUTLINE);
            }
            ObjectShape::Other => draw_circle(sx, sy, 3.0, OBJECT_OUTLINE),
        }
    }
}

fn draw_hud(snapshot: &GridSnapshot, hovered: Option<Cell>) {
    let describe = |cell: Option<Cell>| cell.map_or_else(|| "-".to_string(), |c| c.to_string());
    let route = match (snapshot.end, snapshot.path.len()) {
        (None, _) => "no end".to_string(),
        (Some(_), 0) => "unreachable".to_string(),
        (Some(_), n) => format!("{} cells", n),
    };

    draw_text(
        &format!(
            "Start: {}  End: {}  Path: {}  Obstacles: {}  Hover: {}",
            describe(snapshot.start),
            describe(snapshot.end),
            route,
            snapshot.obstacles.len(),
            describe(hovered),
        ),
        10.0,
        22.0,
        20.0,
        BLACK,
    );
    draw_text(
        "LMB end | Shift+LMB start | RMB obstacle | B cube | O cylinder | X remove object | P clear path | C clear all | R random start",
        10.0,
        46.0,
        16.0,
        DARKGRAY,
    );
}

pub async fn run_visualization_loop(mut state: GridState, view: &ViewSettings) {
    let mut renderer = GridRenderer::default();
    let mut placements = Placements::default();
    state.publish(&mut renderer);

    info!("Visualization loop starting...");

    loop {
        let viewport = Viewport::fit(screen_width(), screen_height(), state.mapper(), view.pixels_per_unit);

        let (mx, my) = mouse_position();
        let (wx, wz) = viewport.screen_to_world(mx, my);
        let hovered = state
            .mapper()
            .contains_world(wx, wz)
            .then(|| state.world_to_grid_position(wx, wz));

        if handle_input(&mut state, &mut placements, hovered) {
            state.publish(&mut renderer);
            debug!(path_length = state.path().len(), "Grid state republished");
        }

        clear_background(BACKGROUND);
        if let Some(snapshot) = &renderer.snapshot {
            draw_grid(&state, snapshot, &viewport, view, hovered);
            draw_objects(&placements, &viewport);
            draw_hud(snapshot, hovered);
        }

        next_frame().await
    }
}
