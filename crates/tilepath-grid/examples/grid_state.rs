use nalgebra::Point3;
use tilepath_grid::{
    Cell, GridConfig, GridSnapshot, GridState, ObjectHandle, ObjectShape, PlacedObject,
    TileSink, TileStatus,
};
use tracing_subscriber::EnvFilter;

/// Prints every published snapshot as an ASCII grid.
struct ConsoleSink {
    width: usize,
    height: usize,
}

impl TileSink for ConsoleSink {
    fn refresh(&mut self, snapshot: &GridSnapshot) {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let symbol = match snapshot.tiles.get(&Cell::new(x, y)) {
                    Some(TileStatus::Start) => 'S',
                    Some(TileStatus::End) => 'G',
                    Some(TileStatus::Path) => '*',
                    Some(TileStatus::Obstacle) => 'X',
                    Some(TileStatus::Default) | None => '.',
                };
                print!("{} ", symbol);
            }
            println!();
        }
        println!("path: {} cells\n", snapshot.path.len());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = GridConfig::from_extent(12.0, 12)?;
    let mut state = GridState::new(config);
    let mut sink = ConsoleSink {
        width: config.width(),
        height: config.height(),
    };

    state.set_start(Cell::new(1, 1));
    state.set_end(Cell::new(10, 10));
    println!("Open grid:");
    state.publish(&mut sink);

    for y in 1..12 {
        state.add_obstacle(Cell::new(6, y));
    }
    println!("Wall at x = 6 with a gap at the bottom:");
    state.publish(&mut sink);

    let crate_position = state.grid_to_world_position(Cell::new(6, 0), 0.5);
    let handle = ObjectHandle(1);
    state.add_placed_object(handle, &PlacedObject::new(crate_position, ObjectShape::cube(0.5)), true);
    println!("Crate dropped into the gap (route blocked):");
    state.publish(&mut sink);

    state.remove_custom_object(handle, true);
    let barrel = PlacedObject::new(Point3::new(-3.0, 0.5, 3.0), ObjectShape::cylinder(0.5));
    state.add_placed_object(ObjectHandle(2), &barrel, true);
    println!("Crate removed, barrel placed:");
    state.publish(&mut sink);

    state.clear_all();
    println!("Cleared:");
    state.publish(&mut sink);

    Ok(())
}
