use tracing::warn;

use crate::engine::physics::rigid_body::{RigidBody, SimObject};
use crate::engine::physics::vector::{self, Vector2D};

/// Clicks closer than this to the primary body are refused.
pub const MIN_SPAWN_DISTANCE: f64 = 1e-6;

/// Places new satellites on roughly circular orbits around a primary body.
///
/// Speed scales with `reference_distance / distance`, so a click at the
/// reference distance reproduces `base_speed` exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalSpawner {
    pub base_speed: f64,
    pub reference_distance: f64,
}

impl OrbitalSpawner {
    pub fn new(base_speed: f64, reference_distance: f64) -> Self {
        Self {
            base_speed,
            reference_distance,
        }
    }

    pub fn orbital_velocity(&self, primary: &RigidBody, at: Vector2D) -> Option<Vector2D> {
        let r = at - primary.position;
        let dist = r.length();
        if !dist.is_finite() || dist < MIN_SPAWN_DISTANCE {
            return None;
        }
        let direction = vector::tangent(r)?;
        let ratio = self.reference_distance / dist;
        Some(direction * (self.base_speed * ratio))
    }

    /// New object at `at` copying mass, size and material from `template`,
    /// moving tangentially around `primary`.
    pub fn spawn(&self, primary: &RigidBody, template: &SimObject, at: Vector2D) -> Option<SimObject> {
        let Some(velocity) = self.orbital_velocity(primary, at) else {
            warn!(
                "spawn at ({:.2}, {:.2}) coincides with the primary body, ignoring",
                at.x, at.y
            );
            return None;
        };

        let body = RigidBody::new(template.body.mass, at, velocity);
        Some(SimObject::new(body, template.size, template.material))
    }
}
