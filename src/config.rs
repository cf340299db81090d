use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use horizon_runtime::StreamConfig;
use horizon_terrain::TerrainConfig;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

/// Fly-through path: the viewer moves `speed` units along `-z` every frame.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CameraConfig {
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_start_z")]
    pub start_z: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_look_down")]
    pub look_down: f32,
    #[serde(default = "default_fovy")]
    pub fovy: f32,
}

fn default_speed() -> f32 {
    40.0
}
fn default_start_z() -> f32 {
    5100.0
}
fn default_height() -> f32 {
    410.0
}
fn default_look_down() -> f32 {
    -1000.0
}
fn default_fovy() -> f32 {
    45.0
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            start_z: default_start_z(),
            height: default_height(),
            look_down: default_look_down(),
            fovy: default_fovy(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_window_height")]
    pub height: i32,
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    #[serde(default = "default_wireframe")]
    pub wireframe: bool,
    #[serde(default)]
    pub show_bounds: bool,
    /// World-to-view scale; keeps the far chunks inside raylib's default clip range.
    #[serde(default = "default_view_scale")]
    pub view_scale: f32,
}

fn default_width() -> i32 {
    1280
}
fn default_window_height() -> i32 {
    720
}
fn default_target_fps() -> u32 {
    60
}
fn default_wireframe() -> bool {
    true
}
fn default_view_scale() -> f32 {
    0.01
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_window_height(),
            target_fps: default_target_fps(),
            wireframe: default_wireframe(),
            show_bounds: false,
            view_scale: default_view_scale(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.stream.validate()?;
        self.terrain.validate()?;
        let c = &self.camera;
        for (name, v) in [
            ("camera.speed", c.speed),
            ("camera.start_z", c.start_z),
            ("camera.height", c.height),
            ("camera.look_down", c.look_down),
        ] {
            if !v.is_finite() {
                return Err(format!("{name} must be finite (got {v})"));
            }
        }
        if !(c.fovy > 0.0 && c.fovy < 180.0) {
            return Err(format!("camera.fovy must be in (0, 180) (got {})", c.fovy));
        }
        let w = &self.window;
        if w.width <= 0 || w.height <= 0 {
            return Err(format!(
                "window size must be positive (got {}x{})",
                w.width, w.height
            ));
        }
        if !(w.view_scale.is_finite() && w.view_scale > 0.0) {
            return Err(format!("window.view_scale must be > 0 (got {})", w.view_scale));
        }
        Ok(())
    }
}

pub fn load_from_path(path: &Path) -> Result<AppConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&s)?;
    cfg.validate()?;
    log::info!("config loaded from {}", path.display());
    Ok(cfg)
}
