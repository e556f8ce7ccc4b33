use std::collections::HashMap;

use glam::{Vec2, Vec4};
use orbitsim::engine::{BodyId, SimConfig, SimInput, SimulationState};
use rand::Rng;
use sokol::{app as sapp, gfx as sg};
use tracing::{error, info};

use crate::debug::{debug_flags, toggle_debug_overlay};
use crate::game::{EngineServices, Game, GameConfig};
use crate::graphics::Sprite;
use crate::input::InputManager;

const SATELLITE_TINTS: [Vec4; 6] = [
    Vec4::new(1.0, 0.6, 0.6, 1.0),
    Vec4::new(0.6, 1.0, 0.6, 1.0),
    Vec4::new(0.6, 0.7, 1.0, 1.0),
    Vec4::new(1.0, 1.0, 0.5, 1.0),
    Vec4::new(1.0, 0.6, 1.0, 1.0),
    Vec4::new(0.5, 1.0, 1.0, 1.0),
];

pub struct OrbitGame {
    sim_config: SimConfig,
    state: Option<SimulationState>,
    /// Tints for clicked-in satellites; bodies without an entry draw untinted.
    tints: HashMap<BodyId, Vec4>,
    ticks_last_frame: u32,
}

impl OrbitGame {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(sim_config: SimConfig) -> Self {
        Self {
            sim_config,
            state: None,
            tints: HashMap::new(),
            ticks_last_frame: 0,
        }
    }

    fn handle_sim_input(&mut self, input: SimInput) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if let Some(id) = state.handle_input(input) {
            let mut rng = rand::rng();
            let tint = SATELLITE_TINTS[rng.random_range(0..SATELLITE_TINTS.len())];
            self.tints.insert(id, tint);
            info!("spawned body {} ({} total)", id.0, state.world().len());
        }
    }

    fn overlay_lines(state: &SimulationState, ticks: u32) -> Vec<String> {
        let camera = state.camera();
        let stats = state.world().stats();
        vec![
            format!("bodies    {}", stats.total_bodies),
            format!("camera    ({:.1}, {:.1})", camera.position.x, camera.position.y),
            format!("zoom      {:.4}", camera.zoom()),
            format!("ticks     {}", ticks),
            format!("energy    {:.6e}", stats.total_energy()),
            format!("momentum  ({:.3e}, {:.3e})", stats.momentum.x, stats.momentum.y),
        ]
    }
}

impl Game for OrbitGame {
    fn config() -> GameConfig {
        GameConfig::new()
            .with_title("Orbit Sandbox")
            .with_size(2560, 1440)
            .with_background(sg::Color { r: 0.0, g: 0.0, b: 0.02, a: 1.0 })
            .with_samples(4)
            .with_fullscreen(false)
    }

    fn init(&mut self, config: &GameConfig, services: &mut EngineServices) {
        info!("resource path: {}", config.resource_dir.display());
        let earth_path = config.resource("earth.png");
        let moon_path = config.resource("moon.png");
        info!("earth texture: {}", earth_path.display());
        info!("moon texture: {}", moon_path.display());

        let earth = services.textures.load_or_white("earth", &earth_path);
        let moon = services.textures.load_or_white("moon", &moon_path);

        let (width, height) = (sapp::widthf() as f64, sapp::heightf() as f64);
        info!("viewport {}x{}", width, height);
        match SimulationState::with_earth_moon(self.sim_config.clone(), width, height, earth, moon) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                error!("could not build the initial scene: {}", e);
                sapp::request_quit();
            }
        }
    }

    fn update(&mut self, dt: f64, input: &mut InputManager, _services: &mut EngineServices) {
        if input.is_key_pressed(sapp::Keycode::F1) {
            toggle_debug_overlay();
        }

        let events: Vec<SimInput> = input.drain_events().collect();
        for event in events {
            self.handle_sim_input(event);
        }

        if let Some(state) = self.state.as_mut() {
            state.set_held_directions(input.held_directions());
            self.ticks_last_frame = state.advance(dt);
        }
    }

    fn render(&mut self, services: &mut EngineServices) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let camera = state.camera();
        let zoom = camera.zoom();

        for (id, object) in state.world().iter() {
            if !camera.is_visible(object.body.position, object.size) {
                continue;
            }
            let center = camera.world_to_screen(object.body.position).as_vec2();
            let size = (object.size * zoom).as_vec2();
            let tint = self.tints.get(&id).copied().unwrap_or(Vec4::ONE);
            services
                .renderer
                .draw_sprite(&Sprite::new(center, size.max(Vec2::ONE), object.material).with_color(tint));
        }
        services.renderer.flush(camera, services.textures);

        services.overlay.set_color(Vec4::ONE);
        services.overlay.draw_top_left(1.0, &[state.warp_label()]);
        if debug_flags().is_overlay_enabled() {
            let lines = Self::overlay_lines(state, self.ticks_last_frame);
            services.overlay.set_color(Vec4::new(0.6, 1.0, 0.6, 1.0));
            services.overlay.draw_top_right(1.0, &lines);
        }
    }
}

