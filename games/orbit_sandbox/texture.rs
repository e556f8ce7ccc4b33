use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use orbitsim::engine::MaterialId;
use sokol::gfx as sg;
use tracing::{debug, warn};

/// Owns GPU images and hands out `MaterialId`s for them. Material 0 is always
/// the 1x1 white texture, so a body whose image failed to load still draws as
/// a tinted square.
pub struct TextureManager {
    textures: Vec<sg::Image>,
    by_name: HashMap<String, MaterialId>,
}

impl TextureManager {
    pub const WHITE: MaterialId = MaterialId(0);

    pub fn new() -> Self {
        Self {
            textures: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn init(&mut self) {
        let white_pixels = [255u8, 255, 255, 255];
        let white = make_rgba_image(1, 1, &white_pixels);
        self.textures.clear();
        self.textures.push(white);
        self.by_name.clear();
        self.by_name.insert("white".to_string(), Self::WHITE);
    }

    /// Load `path` under `name`, or reuse it if already loaded. A file that
    /// cannot be read or decoded maps to the white texture.
    pub fn load_or_white(&mut self, name: &str, path: &Path) -> MaterialId {
        match self.load_texture(name, path) {
            Ok(material) => material,
            Err(e) => {
                warn!("texture {:?} unavailable, using white: {:#}", name, e);
                self.by_name.insert(name.to_string(), Self::WHITE);
                Self::WHITE
            }
        }
    }

    pub fn load_texture(&mut self, name: &str, path: &Path) -> Result<MaterialId> {
        if let Some(&material) = self.by_name.get(name) {
            return Ok(material);
        }

        let img = image::open(path).with_context(|| format!("opening {}", path.display()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!("loaded {} ({}x{}) from {}", name, width, height, path.display());

        let material = MaterialId(self.textures.len() as u32);
        self.textures.push(make_rgba_image(width, height, rgba.as_raw()));
        self.by_name.insert(name.to_string(), material);
        Ok(material)
    }

    /// Unknown materials resolve to the white texture.
    pub fn image(&self, material: MaterialId) -> sg::Image {
        self.textures
            .get(material.0 as usize)
            .or_else(|| self.textures.first())
            .copied()
            .unwrap_or_default()
    }
}

fn make_rgba_image(width: u32, height: u32, pixels: &[u8]) -> sg::Image {
    let mut data = sg::ImageData::new();
    data.subimage[0][0] = sg::Range {
        ptr: pixels.as_ptr() as *const _,
        size: pixels.len(),
    };
    sg::make_image(&sg::ImageDesc {
        width: width as i32,
        height: height as i32,
        pixel_format: sg::PixelFormat::Rgba8,
        data,
        ..Default::default()
    })
}
