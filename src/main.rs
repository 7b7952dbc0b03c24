mod graphics;
mod settings;
mod viewport;

use anyhow::Context;
use graphics::window_conf;
use settings::{DEFAULT_CONFIG_PATH, Settings, load_settings};
use tilepath_grid::GridState;
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

#[macroquad::main(window_conf)]
async fn main() {
    let config_path =
        std::env::var("TILEPATH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let settings = match load_settings(&config_path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings from {}: {}", config_path, e);
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    info!(?settings, "Tilepath started");

    if let Err(e) = run(settings).await {
        error!("Visualizer failed: {:?}", e);
    }
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let config = settings
        .grid
        .to_grid_config()
        .context("Invalid grid settings")?;
    info!(%config, "Grid configured");

    let state = GridState::new(config);
    info!(start = ?state.start_cell(), "Random start assigned");

    graphics::run_visualization_loop(state, &settings.view).await;
    Ok(())
}
