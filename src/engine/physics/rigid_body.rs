use crate::engine::error::PhysicsError;
use crate::engine::physics::vector::{self, Vector2D};

/// Smallest mass a body can be clamped to by the setters.
pub const MIN_MASS: f64 = 1e-6;

/// Stable index of a body in the registry. Ids are handed out in insertion
/// order and never reused, since bodies are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl BodyId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Opaque reference to a texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialId(pub u32);

/// Point mass taking part in gravity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub mass: f64,
    pub position: Vector2D,
    /// World units per simulated time unit.
    pub velocity: Vector2D,
    /// Acceleration applied during the most recent step.
    pub acceleration: Vector2D,
}

impl RigidBody {
    /// Body at rest at `position` with the placeholder mass `MIN_MASS`.
    pub fn at(position: Vector2D) -> Self {
        Self {
            mass: MIN_MASS,
            position,
            velocity: Vector2D::ZERO,
            acceleration: Vector2D::ZERO,
        }
    }

    pub fn new(mass: f64, position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            mass,
            position,
            velocity,
            acceleration: Vector2D::ZERO,
        }
    }

    /// Checks the body can be admitted into a simulation.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(self.mass));
        }
        if !vector::is_finite(self.position) || !vector::is_finite(self.velocity) {
            return Err(PhysicsError::NonFiniteState);
        }
        Ok(())
    }

    /// Set the mass, clamped to `MIN_MASS`. NaN collapses to `MIN_MASS` too.
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = if mass.is_nan() { MIN_MASS } else { mass.max(MIN_MASS) };
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    pub fn momentum(&self) -> Vector2D {
        self.velocity * self.mass
    }
}

/// Builder pattern for useful properties
impl RigidBody {
    /// Set the mass (clamped to a minimum to avoid division by zero)
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.set_mass(mass);
        self
    }

    pub fn with_position(mut self, position: Vector2D) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector2D) -> Self {
        self.velocity = velocity;
        self
    }
}

/// A body plus what the renderer needs to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct SimObject {
    pub body: RigidBody,
    /// Width and height in world units.
    pub size: Vector2D,
    pub material: MaterialId,
}

impl SimObject {
    pub fn new(body: RigidBody, size: Vector2D, material: MaterialId) -> Self {
        Self { body, size, material }
    }

    pub fn with_size(mut self, size: Vector2D) -> Self {
        self.size = size;
        self
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = material;
        self
    }
}
