use glam::{DVec2, Mat4};

use crate::engine::input::{self, HeldDirections};

pub const DEFAULT_MIN_ZOOM: f64 = 0.001;
pub const DEFAULT_ZOOM_SENSITIVITY: f64 = 0.5;
pub const DEFAULT_PAN_SPEED: f64 = 600.0;

/// Maps world coordinates to screen pixels and back.
///
/// Screen space has its origin in the top-left corner with y growing
/// downwards; the camera position is the world point drawn at the centre of
/// the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    pub position: DVec2, // World position the camera is looking at
    pub velocity: DVec2, // World units per real second
    zoom: f64,           // Screen pixels per world unit

    min_zoom: f64,
    zoom_sensitivity: f64,
    pan_speed: f64,

    viewport_width: f64,
    viewport_height: f64,
}

/// Engine functions for camera
impl Camera2D {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            zoom: 1.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            zoom_sensitivity: DEFAULT_ZOOM_SENSITIVITY,
            pan_speed: DEFAULT_PAN_SPEED,
            viewport_width,
            viewport_height,
        }
    }

    pub fn with_position(mut self, position: DVec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_zoom_limits(mut self, min_zoom: f64, sensitivity: f64) -> Self {
        self.min_zoom = min_zoom.abs().max(f64::MIN_POSITIVE);
        self.zoom_sensitivity = sensitivity;
        self.set_zoom(self.zoom);
        self
    }

    pub fn with_pan_speed(mut self, pan_speed: f64) -> Self {
        self.pan_speed = pan_speed;
        self
    }

    // Engine calls this when window size changes
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Free-look motion for one frame. `real_dt` is wall-clock seconds, so
    /// panning is unaffected by the simulation time scale. Pan speed is
    /// constant in screen pixels regardless of zoom.
    pub fn update(&mut self, held: &HeldDirections, real_dt: f64) {
        self.velocity = input::camera_velocity(held) * (self.pan_speed / self.zoom);
        self.position += self.velocity * real_dt;
    }

    /// Orthographic projection from screen pixels to clip space, for a
    /// renderer that draws in the coordinates `world_to_screen` returns.
    pub fn screen_projection(&self) -> Mat4 {
        Mat4::orthographic_rh(
            0.0,
            self.viewport_width as f32, // left, right
            self.viewport_height as f32,
            0.0, // bottom, top (y down)
            -1.0,
            1.0,
        )
    }
}

impl Camera2D {
    // Coordinate conversion methods (useful for mouse interaction)
    pub fn screen_center(&self) -> DVec2 {
        DVec2::new(self.viewport_width * 0.5, self.viewport_height * 0.5)
    }

    pub fn world_to_screen(&self, world_pos: DVec2) -> DVec2 {
        (world_pos - self.position) * self.zoom + self.screen_center()
    }

    pub fn screen_to_world(&self, screen_pos: DVec2) -> DVec2 {
        (screen_pos - self.screen_center()) / self.zoom + self.position
    }

    /// Zoom clamped to the configured minimum. NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.max(self.min_zoom);
    }

    /// Exponential zoom: each wheel notch scales by `1 + sensitivity`.
    pub fn apply_wheel(&mut self, wheel_delta: f64) {
        let amount = wheel_delta * self.zoom * self.zoom_sensitivity;
        self.set_zoom(self.zoom + amount);
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn viewport_size(&self) -> DVec2 {
        DVec2::new(self.viewport_width, self.viewport_height)
    }

    pub fn view_half_extents(&self) -> DVec2 {
        DVec2::new(
            self.viewport_width * 0.5 / self.zoom,
            self.viewport_height * 0.5 / self.zoom,
        )
    }

    pub fn visible_aabb(&self) -> (DVec2, DVec2) {
        let half = self.view_half_extents();
        (self.position - half, self.position + half)
    }

    /// Whether a world-space rectangle centred on `center` overlaps the view.
    pub fn is_visible(&self, center: DVec2, size: DVec2) -> bool {
        let (min, max) = self.visible_aabb();
        let half = size * 0.5;
        center.x + half.x >= min.x
            && center.x - half.x <= max.x
            && center.y + half.y >= min.y
            && center.y - half.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::Direction;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn centre_maps_to_camera_position() {
        let cam = Camera2D::new(800.0, 600.0).with_position(DVec2::new(10.0, 20.0));
        assert_eq!(cam.world_to_screen(DVec2::new(10.0, 20.0)), DVec2::new(400.0, 300.0));
        assert_eq!(cam.screen_to_world(DVec2::new(400.0, 300.0)), DVec2::new(10.0, 20.0));
    }

    #[test]
    fn zoom_scales_distances_from_centre() {
        let mut cam = Camera2D::new(800.0, 600.0);
        cam.set_zoom(2.0);
        assert_eq!(cam.world_to_screen(DVec2::new(10.0, -5.0)), DVec2::new(420.0, 290.0));
    }

    #[test]
    fn round_trip_holds_for_random_cameras() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..2000 {
            let mut cam = Camera2D::new(rng.random_range(1.0..4000.0), rng.random_range(1.0..4000.0))
                .with_position(DVec2::new(
                    rng.random_range(-1e5..1e5),
                    rng.random_range(-1e5..1e5),
                ));
            cam.set_zoom(rng.random_range(0.001..50.0));
            let p = DVec2::new(rng.random_range(-1e5..1e5), rng.random_range(-1e5..1e5));

            let back = cam.screen_to_world(cam.world_to_screen(p));
            let scale = p.abs().max_element().max(cam.position.abs().max_element()).max(1.0);
            assert!(
                (back - p).abs().max_element() <= 1e-9 * scale,
                "{:?} -> {:?} (zoom {})",
                p,
                back,
                cam.zoom()
            );
        }
    }

    #[test]
    fn wheel_is_multiplicative() {
        let mut cam = Camera2D::new(800.0, 600.0);
        cam.apply_wheel(1.0);
        assert_eq!(cam.zoom(), 1.5);
        cam.apply_wheel(1.0);
        assert_eq!(cam.zoom(), 2.25);
        cam.apply_wheel(-1.0);
        assert_eq!(cam.zoom(), 1.125);
    }

    #[test]
    fn zoom_never_drops_below_floor() {
        let mut cam = Camera2D::new(800.0, 600.0);
        for _ in 0..100 {
            cam.apply_wheel(-10.0);
            assert!(cam.zoom() >= DEFAULT_MIN_ZOOM);
        }
        assert_eq!(cam.zoom(), DEFAULT_MIN_ZOOM);

        cam.set_zoom(-4.0);
        assert_eq!(cam.zoom(), DEFAULT_MIN_ZOOM);
        cam.set_zoom(f64::NAN);
        assert_eq!(cam.zoom(), DEFAULT_MIN_ZOOM);
    }

    #[test]
    fn custom_zoom_floor() {
        let mut cam = Camera2D::new(800.0, 600.0).with_zoom_limits(0.25, 0.5);
        cam.apply_wheel(-3.0);
        assert_eq!(cam.zoom(), 0.25);
    }

    #[test]
    fn panning_follows_held_keys_in_real_time() {
        let mut cam = Camera2D::new(800.0, 600.0).with_pan_speed(100.0);
        let held: HeldDirections = [Direction::Right, Direction::Up].into_iter().collect();
        cam.update(&held, 0.5);
        assert_eq!(cam.position, DVec2::new(50.0, -50.0));

        cam.set_zoom(2.0);
        cam.update(&held, 0.5);
        assert_eq!(cam.position, DVec2::new(75.0, -75.0));

        cam.update(&HeldDirections::new(), 1.0);
        assert_eq!(cam.velocity, DVec2::ZERO);
        assert_eq!(cam.position, DVec2::new(75.0, -75.0));
    }

    #[test]
    fn visibility_uses_the_view_rectangle() {
        let cam = Camera2D::new(800.0, 600.0);
        assert!(cam.is_visible(DVec2::ZERO, DVec2::splat(1.0)));
        assert!(cam.is_visible(DVec2::new(450.0, 0.0), DVec2::splat(128.0)));
        assert!(!cam.is_visible(DVec2::new(1000.0, 0.0), DVec2::splat(128.0)));
    }
}
