use tracing::{debug, info, warn};

use crate::engine::camera::Camera2D;
use crate::engine::config::SimConfig;
use crate::engine::error::PhysicsError;
use crate::engine::input::{HeldDirections, SimInput};
use crate::engine::physics::gravity::Gravity;
use crate::engine::physics::physics_world::PhysicsWorld;
use crate::engine::physics::rigid_body::{BodyId, MaterialId, RigidBody, SimObject};
use crate::engine::physics::spawn::OrbitalSpawner;
use crate::engine::physics::vector::Vector2D;

/// Everything the simulation mutates over a run: bodies, camera, time scale
/// and the currently held pan directions.
///
/// Created once at startup and dropped at shutdown, which releases the body
/// storage.
pub struct SimulationState {
    config: SimConfig,
    world: PhysicsWorld,
    camera: Camera2D,
    spawner: OrbitalSpawner,

    delta_time_scale: f64,
    held: HeldDirections,
    accumulator: f64,

    /// Attractor new satellites orbit around.
    primary: Option<BodyId>,
    /// Body whose mass, size and material new satellites copy.
    spawn_template: Option<BodyId>,
}

impl SimulationState {
    pub fn new(config: SimConfig, viewport_width: f64, viewport_height: f64) -> Self {
        let world = PhysicsWorld::new(Gravity::new(config.gravitational_constant, config.softening));
        let mut camera = Camera2D::new(viewport_width, viewport_height)
            .with_position(Vector2D::new(viewport_width * 0.5, viewport_height * 0.5))
            .with_zoom_limits(config.min_zoom, config.zoom_sensitivity)
            .with_pan_speed(config.pan_speed);
        camera.set_zoom(config.initial_zoom);
        let spawner = OrbitalSpawner::new(config.base_orbit_speed, config.reference_distance);

        Self {
            config,
            world,
            camera,
            spawner,
            delta_time_scale: 1.0,
            held: HeldDirections::new(),
            accumulator: 0.0,
            primary: None,
            spawn_template: None,
        }
    }

    /// The reference scene: a primary body at the viewport centre and a
    /// satellite `reference_distance` below it moving along +x.
    pub fn with_earth_moon(
        config: SimConfig,
        viewport_width: f64,
        viewport_height: f64,
        earth_material: MaterialId,
        moon_material: MaterialId,
    ) -> Result<Self, PhysicsError> {
        let mut state = Self::new(config, viewport_width, viewport_height);
        let center = Vector2D::new(viewport_width * 0.5, viewport_height * 0.5);
        let cfg = &state.config;

        let earth = SimObject::new(
            RigidBody::new(cfg.primary_mass, center, Vector2D::ZERO),
            cfg.primary_size,
            earth_material,
        );
        let moon = SimObject::new(
            RigidBody::new(
                cfg.satellite_mass(),
                center + Vector2D::new(0.0, cfg.reference_distance),
                Vector2D::new(cfg.base_orbit_speed, 0.0),
            ),
            cfg.satellite_size,
            moon_material,
        );

        let earth = state.add_object(earth)?;
        let moon = state.add_object(moon)?;
        state.set_primary(earth);
        state.set_spawn_template(moon);

        info!("initial scene: {} bodies", state.world.len());
        for (id, object) in state.world.iter() {
            debug!(
                "  body {}: mass={} pos=({:.1}, {:.1}) vel=({}, {})",
                id.0,
                object.body.mass,
                object.body.position.x,
                object.body.position.y,
                object.body.velocity.x,
                object.body.velocity.y
            );
        }
        Ok(state)
    }

    pub fn add_object(&mut self, object: SimObject) -> Result<BodyId, PhysicsError> {
        self.world.add(object)
    }

    pub fn set_primary(&mut self, id: BodyId) {
        self.primary = Some(id);
    }

    pub fn set_spawn_template(&mut self, id: BodyId) {
        self.spawn_template = Some(id);
    }

    pub fn primary(&self) -> Option<BodyId> {
        self.primary
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn held_directions(&self) -> &HeldDirections {
        &self.held
    }

    /// Replace the held pan directions. The input layer recomputes the set
    /// from its key state every frame.
    pub fn set_held_directions(&mut self, held: HeldDirections) {
        self.held = held;
    }
}

/// Time scale
impl SimulationState {
    pub fn delta_time_scale(&self) -> f64 {
        self.delta_time_scale
    }

    /// Clamped to the configured range; NaN is ignored.
    pub fn set_delta_time_scale(&mut self, scale: f64) {
        if scale.is_nan() {
            return;
        }
        self.delta_time_scale = scale.clamp(
            self.config.min_delta_time_scale,
            self.config.max_delta_time_scale,
        );
    }

    pub fn warp_in(&mut self) {
        self.set_delta_time_scale(self.delta_time_scale * 2.0);
        debug!("time scale -> {}", self.delta_time_scale);
    }

    pub fn warp_out(&mut self) {
        self.set_delta_time_scale(self.delta_time_scale / 2.0);
        debug!("time scale -> {}", self.delta_time_scale);
    }

    /// Overlay text for the current warp, e.g. `Warp x8` or `Warp x0.25`.
    pub fn warp_label(&self) -> String {
        // powers of two print exactly
        format!("Warp x{}", self.delta_time_scale)
    }

    /// Simulated time advanced by one fixed tick.
    pub fn step_dt(&self) -> f64 {
        self.config.base_dt * self.delta_time_scale
    }
}

/// Frame driving
impl SimulationState {
    pub fn handle_input(&mut self, input: SimInput) -> Option<BodyId> {
        match input {
            SimInput::WarpIn => self.warp_in(),
            SimInput::WarpOut => self.warp_out(),
            SimInput::Click(screen) => return self.spawn_at_screen(screen),
            SimInput::Wheel(delta) => {
                self.camera.apply_wheel(delta);
                debug!("wheel {} -> zoom {}", delta, self.camera.zoom());
            }
            SimInput::Resize(width, height) => {
                self.camera.set_viewport_size(width, height);
                debug!("viewport resized to {}x{}", width, height);
            }
        }
        None
    }

    /// Spawn a satellite where the pointer was pressed, orbiting the primary.
    pub fn spawn_at_screen(&mut self, screen: Vector2D) -> Option<BodyId> {
        let at = self.camera.screen_to_world(screen);
        let (Some(primary), Some(template)) = (self.primary, self.spawn_template) else {
            warn!("no primary body or spawn template set, ignoring click");
            return None;
        };
        let primary = self.world.get(primary)?.body;
        let template = self.world.get(template)?.clone();

        let object = self.spawner.spawn(&primary, &template, at)?;
        let r = at - primary.position;
        debug!(
            "spawn at screen ({:.1}, {:.1}) world ({:.1}, {:.1}), r = ({:.1}, {:.1})",
            screen.x, screen.y, at.x, at.y, r.x, r.y
        );
        self.world.add(object).ok()
    }

    /// One fixed tick of physics at the current time scale.
    pub fn step_once(&mut self) {
        let dt = self.step_dt();
        self.world.step(dt);
    }

    /// Advance by `real_dt` wall-clock seconds: pan the camera in real time,
    /// then run as many whole fixed ticks as have accumulated. Returns the
    /// number of ticks run.
    pub fn advance(&mut self, real_dt: f64) -> u32 {
        if !real_dt.is_finite() || real_dt <= 0.0 {
            return 0;
        }

        self.camera.update(&self.held, real_dt);

        let tick = self.config.tick_seconds();
        self.accumulator += real_dt;

        let mut ticks = 0;
        while self.accumulator >= tick && ticks < self.config.max_ticks_per_frame {
            self.step_once();
            self.accumulator -= tick;
            ticks += 1;
        }
        if ticks == self.config.max_ticks_per_frame && self.accumulator >= tick {
            // drop what cannot be caught up
            self.accumulator %= tick;
        }
        ticks
    }
}

impl Drop for SimulationState {
    fn drop(&mut self) {
        debug!("releasing simulation state ({} bodies)", self.world.len());
    }
}
