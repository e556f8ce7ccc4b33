use crate::engine::physics::rigid_body::RigidBody;
use crate::engine::physics::vector::Vector2D;

/// Floor applied to the softening length.
pub const MIN_SOFTENING: f64 = 1e-9;

/// Newtonian point-mass gravity with Plummer softening.
///
/// The softened separation is `sqrt(r² + ε²)`, so two coincident bodies pull
/// on each other with zero force instead of an infinite one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    pub constant: f64,
    /// Softening length ε in world units. Must be > 0.
    pub softening: f64,
}

impl Gravity {
    pub fn new(constant: f64, softening: f64) -> Self {
        Self {
            constant,
            softening: softening.abs().max(MIN_SOFTENING),
        }
    }

    /// Acceleration that `source` imparts on a body sitting at `target`.
    pub fn acceleration_from(&self, target: Vector2D, source: &RigidBody) -> Vector2D {
        let r = source.position - target;
        let d2 = r.length_squared() + self.softening * self.softening;
        let inv_d = d2.sqrt().recip();
        r * (self.constant * source.mass * inv_d * inv_d * inv_d)
    }

    /// Fill `out[i]` with the total acceleration on `bodies[i]`.
    ///
    /// Every contribution is read from `bodies` as given, so the result does
    /// not depend on the order in which bodies are visited.
    pub fn accumulate(&self, bodies: &[RigidBody], out: &mut [Vector2D]) {
        debug_assert_eq!(bodies.len(), out.len());
        out.iter_mut().for_each(|a| *a = Vector2D::ZERO);

        let n = bodies.len();
        for i in 0..n {
            let bi = &bodies[i];
            for j in (i + 1)..n {
                let bj = &bodies[j];

                let r = bj.position - bi.position;
                let d2 = r.length_squared() + self.softening * self.softening;
                let inv_d = d2.sqrt().recip();
                let coef = self.constant * inv_d * inv_d * inv_d;

                // equal and opposite
                out[i] += r * (coef * bj.mass);
                out[j] -= r * (coef * bi.mass);
            }
        }
    }

    pub fn accelerations(&self, bodies: &[RigidBody]) -> Vec<Vector2D> {
        let mut out = vec![Vector2D::ZERO; bodies.len()];
        self.accumulate(bodies, &mut out);
        out
    }

    /// Total softened potential energy of the system.
    pub fn potential_energy(&self, bodies: &[RigidBody]) -> f64 {
        let mut energy = 0.0;
        for (i, bi) in bodies.iter().enumerate() {
            for bj in &bodies[i + 1..] {
                let d2 = (bj.position - bi.position).length_squared() + self.softening * self.softening;
                energy -= self.constant * bi.mass * bj.mass / d2.sqrt();
            }
        }
        energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(dist: f64, m1: f64, m2: f64) -> Vec<RigidBody> {
        vec![
            RigidBody::new(m1, Vector2D::new(-dist / 2.0, 0.0), Vector2D::ZERO),
            RigidBody::new(m2, Vector2D::new(dist / 2.0, 0.0), Vector2D::ZERO),
        ]
    }

    #[test]
    fn newton_third_law() {
        let gravity = Gravity::new(0.1, 1e-3);
        let bodies = pair(1.0, 2.0, 3.0);
        let acc = gravity.accelerations(&bodies);

        let net = acc[0] * bodies[0].mass + acc[1] * bodies[1].mass;
        assert!(net.length() < 1e-12, "net force not zero: {:?}", net);
    }

    #[test]
    fn pulls_toward_other_body() {
        let gravity = Gravity::new(1.0, 1e-3);
        let acc = gravity.accelerations(&pair(2.0, 1.0, 1.0));
        assert!(acc[0].x > 0.0);
        assert!(acc[1].x < 0.0);
        assert_eq!(acc[0].y, 0.0);
    }

    #[test]
    fn matches_inverse_square_far_from_softening() {
        let gravity = Gravity::new(2.0, 1e-6);
        let acc = gravity.accelerations(&pair(10.0, 5.0, 7.0));
        // G * m_j / d²
        let expected = 2.0 * 7.0 / 100.0;
        assert!((acc[0].x - expected).abs() < 1e-9);
    }

    #[test]
    fn coincident_bodies_stay_finite() {
        let gravity = Gravity::new(1.0, 0.5);
        let bodies = pair(0.0, 10.0, 10.0);
        let acc = gravity.accelerations(&bodies);
        assert_eq!(acc[0], Vector2D::ZERO);
        assert_eq!(acc[1], Vector2D::ZERO);
        assert!(gravity.potential_energy(&bodies).is_finite());
    }

    #[test]
    fn accumulate_agrees_with_single_source() {
        let gravity = Gravity::new(3.0, 0.25);
        let bodies = vec![
            RigidBody::new(4.0, Vector2D::new(0.0, 0.0), Vector2D::ZERO),
            RigidBody::new(1.0, Vector2D::new(3.0, 1.0), Vector2D::ZERO),
            RigidBody::new(9.0, Vector2D::new(-2.0, 5.0), Vector2D::ZERO),
        ];
        let acc = gravity.accelerations(&bodies);
        let direct = gravity.acceleration_from(bodies[0].position, &bodies[1])
            + gravity.acceleration_from(bodies[0].position, &bodies[2]);
        assert!((acc[0] - direct).length() < 1e-12);
    }

    #[test]
    fn zero_softening_is_bumped_to_positive() {
        let gravity = Gravity::new(1.0, 0.0);
        assert_eq!(gravity.softening, MIN_SOFTENING);
        let acc = gravity.accelerations(&pair(0.0, 1.0, 1.0));
        assert!(acc.iter().all(|a| a.x.is_finite() && a.y.is_finite()));
    }
}
