use crate::engine::physics::vector::Vector2D;

/// Tunables for the simulation. The defaults reproduce the earth/moon scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Not calibrated to SI units; picked so the reference moon orbits at a
    /// watchable rate once warped.
    pub gravitational_constant: f64,
    pub softening: f64,

    /// Simulated time units advanced by one fixed tick at time scale 1.
    pub base_dt: f64,
    /// Fixed ticks per real second.
    pub tick_rate: f64,
    pub max_ticks_per_frame: u32,

    pub primary_mass: f64,
    pub satellite_mass_ratio: f64,
    pub primary_size: Vector2D,
    pub satellite_size: Vector2D,

    /// Distance at which a spawned satellite gets exactly `base_orbit_speed`.
    pub reference_distance: f64,
    pub base_orbit_speed: f64,

    pub zoom_sensitivity: f64,
    pub min_zoom: f64,
    /// Zoom the camera starts at.
    pub initial_zoom: f64,
    pub pan_speed: f64,

    pub min_delta_time_scale: f64,
    pub max_delta_time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: 6.6743e-11,
            softening: 1.0,
            base_dt: 20_000.0,
            tick_rate: 60.0,
            max_ticks_per_frame: 8,
            primary_mass: 50_000.0,
            satellite_mass_ratio: 0.0123,
            primary_size: Vector2D::splat(512.0),
            satellite_size: Vector2D::splat(128.0),
            reference_distance: 400.0,
            base_orbit_speed: 0.0001,
            zoom_sensitivity: 0.5,
            min_zoom: 0.001,
            initial_zoom: 0.5,
            pan_speed: 600.0,
            min_delta_time_scale: 0.001,
            max_delta_time_scale: 1_048_576.0,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn satellite_mass(&self) -> f64 {
        self.primary_mass * self.satellite_mass_ratio
    }

    /// Real seconds covered by one fixed tick.
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.tick_rate.max(f64::MIN_POSITIVE)
    }

    pub fn with_gravity(mut self, constant: f64, softening: f64) -> Self {
        self.gravitational_constant = constant;
        self.softening = softening;
        self
    }

    pub fn with_timestep(mut self, base_dt: f64, tick_rate: f64) -> Self {
        self.base_dt = base_dt;
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_max_ticks_per_frame(mut self, ticks: u32) -> Self {
        self.max_ticks_per_frame = ticks.max(1);
        self
    }

    pub fn with_orbit(mut self, reference_distance: f64, base_orbit_speed: f64) -> Self {
        self.reference_distance = reference_distance;
        self.base_orbit_speed = base_orbit_speed;
        self
    }

    pub fn with_initial_zoom(mut self, zoom: f64) -> Self {
        self.initial_zoom = zoom;
        self
    }

    pub fn with_pan_speed(mut self, pan_speed: f64) -> Self {
        self.pan_speed = pan_speed;
        self
    }
}
