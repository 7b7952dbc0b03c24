use std::str::FromStr;

use config::{Config, ConfigError, Environment, File, FileFormat};
use macroquad::color::Color;
use serde::Deserialize;
use thiserror::Error;
use tilepath_grid::{GridConfig, GridError};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Visualizer settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub grid: GridSettings,
    pub view: ViewSettings,
    pub log_level: String,
}

/// Grid geometry as configured: a square of `extent` world units split into
/// `divisions` cells per axis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GridSettings {
    pub extent: f32,
    pub divisions: usize,
}

impl GridSettings {
    pub fn to_grid_config(&self) -> Result<GridConfig, GridError> {
        GridConfig::from_extent(self.extent, self.divisions)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewSettings {
    pub tile_scale: f32,
    pub pixels_per_unit: f32,
    pub colors: ColorSettings,
}

/// Tile palette, one colour per tile status plus the hover highlight.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColorSettings {
    pub base: HexColor,
    pub start: HexColor,
    pub end: HexColor,
    pub path: HexColor,
    pub obstacle: HexColor,
    pub hover: HexColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid colour {0:?}, expected #rrggbb")]
pub struct InvalidColor(String);

/// Opaque colour written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct HexColor(pub Color);

impl FromStr for HexColor {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self(Color::from_rgba(channel(0)?, channel(2)?, channel(4)?, 255)))
    }
}

impl TryFrom<String> for HexColor {
    type Error = InvalidColor;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Loads settings from built-in defaults, then the TOML file at `path` (if it
/// exists), then `TILEPATH__*` environment variables.
pub fn load_settings(path: &str) -> Result<Settings, ConfigError> {
    Config::builder()
        .set_default("log_level", "info")?
        .set_default("grid.extent", 20.0)?
        .set_default("grid.divisions", 20)?
        .set_default("view.tile_scale", 0.95)?
        .set_default("view.pixels_per_unit", 32.0)?
        .set_default("view.colors.base", "#444444")?
        .set_default("view.colors.start", "#ff0000")?
        .set_default("view.colors.end", "#ffff00")?
        .set_default("view.colors.path", "#ff69b4")?
        .set_default("view.colors.obstacle", "#222222")?
        .set_default("view.colors.hover", "#00aaff")?
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("TILEPATH")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
