use std::{env, path::PathBuf};

use sokol::gfx as sg;

use crate::graphics::Renderer;
use crate::input::InputManager;
use crate::text::TextOverlay;
use crate::texture::TextureManager;

/// Directory textures are read from when `ORBITSIM_RESOURCE_PATH` is unset.
pub const DEFAULT_RESOURCE_DIR: &str = "/usr/local/share/orbitsim_resources";
pub const RESOURCE_PATH_ENV: &str = "ORBITSIM_RESOURCE_PATH";

#[derive(Clone)]
pub struct GameConfig {
    pub window_title: String,
    pub window_width: i32,
    pub window_height: i32,
    pub background_color: sg::Color,
    pub sample_count: i32,
    pub high_dpi: bool,
    pub fullscreen: bool,
    pub resource_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_title: "Orbit Sandbox".to_string(),
            window_width: 2560,
            window_height: 1440,
            background_color: sg::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 },
            sample_count: 4,
            high_dpi: false,
            fullscreen: false,
            resource_dir: resource_dir_from_env(),
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.window_title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn with_background(mut self, color: sg::Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_samples(mut self, samples: i32) -> Self {
        self.sample_count = samples;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn resource(&self, file_name: &str) -> PathBuf {
        self.resource_dir.join(file_name)
    }
}

pub fn resource_dir_from_env() -> PathBuf {
    resolve_resource_dir(env::var(RESOURCE_PATH_ENV).ok())
}

fn resolve_resource_dir(value: Option<String>) -> PathBuf {
    match value {
        Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_RESOURCE_DIR),
    }
}

/// Engine owned resources handed to the game each callback.
pub struct EngineServices<'a> {
    pub renderer: &'a mut Renderer,
    pub textures: &'a mut TextureManager,
    pub overlay: &'a mut TextOverlay,
}

// Trait that games must implement
pub trait Game {
    fn config() -> GameConfig
    where
        Self: Sized;

    fn init(&mut self, config: &GameConfig, services: &mut EngineServices);
    fn update(&mut self, dt: f64, input: &mut InputManager, services: &mut EngineServices);
    fn render(&mut self, services: &mut EngineServices);

    fn handle_event(&mut self, _event: &sokol::app::Event) {}

    fn request_background_color_change(&mut self) -> Option<sg::Color> {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_dir_falls_back_when_unset_or_empty() {
        assert_eq!(resolve_resource_dir(None), PathBuf::from(DEFAULT_RESOURCE_DIR));
        assert_eq!(resolve_resource_dir(Some(String::new())), PathBuf::from(DEFAULT_RESOURCE_DIR));
        assert_eq!(resolve_resource_dir(Some("  ".to_string())), PathBuf::from(DEFAULT_RESOURCE_DIR));
    }

    #[test]
    fn resource_dir_uses_set_value() {
        let dir = resolve_resource_dir(Some("/opt/orbit".to_string()));
        assert_eq!(dir, PathBuf::from("/opt/orbit"));
        assert_eq!(dir.join("earth.png"), PathBuf::from("/opt/orbit/earth.png"));
    }
}
