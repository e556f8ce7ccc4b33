use tracing::{debug, warn};

use crate::engine::error::PhysicsError;
use crate::engine::physics::gravity::Gravity;
use crate::engine::physics::rigid_body::{BodyId, MaterialId, RigidBody, SimObject};
use crate::engine::physics::vector::{self, Vector2D};

/// Accelerations for one step, computed from a single snapshot of positions.
///
/// Only the bodies that existed when the plan was made are advanced by it;
/// anything added in between is left untouched until the next step.
#[derive(Debug, Clone)]
pub struct StepPlan {
    dt: f64,
    accelerations: Vec<Vector2D>,
}

impl StepPlan {
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of bodies the plan covers.
    pub fn len(&self) -> usize {
        self.accelerations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accelerations.is_empty()
    }

    pub fn acceleration(&self, id: BodyId) -> Option<Vector2D> {
        self.accelerations.get(id.index()).copied()
    }
}

/// Owns every simulated object and advances them under mutual gravity.
///
/// Objects live in an insertion-ordered arena addressed by `BodyId`, so
/// growing the arena never invalidates an id held elsewhere.
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    objects: Vec<SimObject>,
    gravity: Gravity,
    snapshot: Vec<RigidBody>,
}

impl PhysicsWorld {
    pub fn new(gravity: Gravity) -> Self {
        Self {
            objects: Vec::new(),
            gravity,
            snapshot: Vec::new(),
        }
    }

    pub fn gravity(&self) -> &Gravity {
        &self.gravity
    }

    /// Append a resting object at `position` with placeholder mass and no
    /// extent. Callers usually adjust it through `get_mut` afterwards.
    pub fn create_at(&mut self, position: Vector2D) -> BodyId {
        let object = SimObject::new(RigidBody::at(position), Vector2D::ZERO, MaterialId::default());
        self.push(object)
    }

    /// Append a fully constructed object after checking it is fit for gravity.
    pub fn add(&mut self, object: SimObject) -> Result<BodyId, PhysicsError> {
        if let Err(err) = object.body.validate() {
            warn!("rejected body: {}", err);
            return Err(err);
        }
        Ok(self.push(object))
    }

    fn push(&mut self, object: SimObject) -> BodyId {
        let id = BodyId(self.objects.len() as u32);
        debug!(
            "added body {} mass={} pos=({:.2}, {:.2})",
            id.0, object.body.mass, object.body.position.x, object.body.position.y
        );
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&SimObject> {
        self.objects.get(id.index())
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut SimObject> {
        self.objects.get_mut(id.index())
    }

    pub fn body(&self, id: BodyId) -> Result<&RigidBody, PhysicsError> {
        self.get(id).map(|o| &o.body).ok_or(PhysicsError::UnknownBody(id))
    }

    /// Objects in insertion order. The iterator is finite and can be
    /// recreated at any time to start over.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &SimObject)> + '_ {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (BodyId(i as u32), o))
    }

    pub fn for_each(&self, mut visit: impl FnMut(BodyId, &SimObject)) {
        for (id, object) in self.iter() {
            visit(id, object);
        }
    }

    pub fn objects(&self) -> &[SimObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Step the physics simulation forward by `dt` time units
    pub fn step(&mut self, dt: f64) {
        let plan = self.plan_step(dt);
        self.apply_step(&plan);
    }

    /// First half of a step: accelerations for every current body.
    pub fn plan_step(&mut self, dt: f64) -> StepPlan {
        self.snapshot.clear();
        self.snapshot.extend(self.objects.iter().map(|o| o.body));

        StepPlan {
            dt,
            accelerations: self.gravity.accelerations(&self.snapshot),
        }
    }

    /// Second half of a step: semi-implicit Euler update, velocity first and
    /// then position with the new velocity.
    pub fn apply_step(&mut self, plan: &StepPlan) {
        let dt = plan.dt;
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        for (i, (object, &a)) in self.objects.iter_mut().zip(&plan.accelerations).enumerate() {
            let body = &mut object.body;
            let velocity = body.velocity + a * dt;
            let position = body.position + velocity * dt;

            if !vector::is_finite(velocity) || !vector::is_finite(position) {
                warn!("body {} left finite range, holding previous state", i);
                body.acceleration = Vector2D::ZERO;
                continue;
            }

            body.acceleration = a;
            body.velocity = velocity;
            body.position = position;
        }
    }

    /// Get physics world statistics
    pub fn stats(&self) -> PhysicsStats {
        let bodies: Vec<RigidBody> = self.objects.iter().map(|o| o.body).collect();
        PhysicsStats {
            total_bodies: bodies.len(),
            kinetic_energy: bodies.iter().map(RigidBody::kinetic_energy).sum(),
            potential_energy: self.gravity.potential_energy(&bodies),
            momentum: bodies.iter().map(RigidBody::momentum).sum(),
        }
    }
}

/// Physics world statistics for debugging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsStats {
    pub total_bodies: usize,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
    pub momentum: Vector2D,
}

impl PhysicsStats {
    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.potential_energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(Gravity::new(1.0, 0.01))
    }

    fn object(mass: f64, x: f64, y: f64) -> SimObject {
        SimObject::new(
            RigidBody::new(mass, Vector2D::new(x, y), Vector2D::ZERO),
            Vector2D::splat(1.0),
            MaterialId(0),
        )
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut w = world();
        let a = w.add(object(1.0, 0.0, 0.0)).unwrap();
        let b = w.create_at(Vector2D::new(5.0, 5.0));
        let c = w.add(object(2.0, 1.0, 0.0)).unwrap();
        assert_eq!((a, b, c), (BodyId(0), BodyId(1), BodyId(2)));

        let order: Vec<BodyId> = w.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, b, c]);
        // restartable
        assert_eq!(w.iter().count(), 3);
        assert_eq!(w.iter().count(), 3);
    }

    #[test]
    fn create_at_places_resting_body() {
        let mut w = world();
        let id = w.create_at(Vector2D::new(10.0, -3.0));
        let body = w.body(id).unwrap();
        assert_eq!(body.position, Vector2D::new(10.0, -3.0));
        assert_eq!(body.velocity, Vector2D::ZERO);
        assert!(body.mass > 0.0);
    }

    #[test]
    fn add_rejects_invalid_mass() {
        let mut w = world();
        assert_eq!(w.add(object(0.0, 0.0, 0.0)), Err(PhysicsError::InvalidMass(0.0)));
        assert_eq!(w.add(object(-3.0, 0.0, 0.0)), Err(PhysicsError::InvalidMass(-3.0)));
        assert!(w.is_empty());
    }

    #[test]
    fn ids_survive_growth() {
        let mut w = world();
        let first = w.add(object(1.0, 7.0, 8.0)).unwrap();
        for i in 0..1000 {
            w.create_at(Vector2D::new(i as f64, 0.0));
        }
        assert_eq!(w.body(first).unwrap().position, Vector2D::new(7.0, 8.0));
        assert_eq!(w.body(BodyId(5000)), Err(PhysicsError::UnknownBody(BodyId(5000))));
    }

    #[test]
    fn step_is_velocity_then_position() {
        let mut w = world();
        let a = w.add(object(100.0, 0.0, 0.0)).unwrap();
        let b = w.add(object(1.0, 10.0, 0.0)).unwrap();

        let plan = w.plan_step(0.5);
        let acc_b = plan.acceleration(b).unwrap();
        w.apply_step(&plan);

        let body = w.body(b).unwrap();
        assert_eq!(body.velocity, acc_b * 0.5);
        assert_eq!(body.position, Vector2D::new(10.0, 0.0) + acc_b * 0.25);
        assert!(body.position.x < 10.0);
        assert!(w.body(a).unwrap().position.x > 0.0);
    }

    #[test]
    fn step_ignores_bad_dt() {
        let mut w = world();
        w.add(object(1.0, 0.0, 0.0)).unwrap();
        w.add(object(1.0, 1.0, 0.0)).unwrap();
        let before = w.objects().to_vec();
        w.step(0.0);
        w.step(-1.0);
        w.step(f64::NAN);
        assert_eq!(w.objects(), &before[..]);
    }

    #[test]
    fn plan_ignores_bodies_added_after_it() {
        let mut w = world();
        w.add(object(50.0, 0.0, 0.0)).unwrap();
        let moon = w.add(object(1.0, 0.0, 20.0)).unwrap();
        let mut reference = w.clone();

        let plan = w.plan_step(1.0);
        let late = w.add(object(1000.0, 0.0, 25.0)).unwrap();
        w.apply_step(&plan);
        reference.step(1.0);

        assert_eq!(plan.len(), 2);
        assert_eq!(w.body(moon).unwrap(), reference.body(moon).unwrap());
        assert_eq!(w.body(late).unwrap().position, Vector2D::new(0.0, 25.0));
        assert_eq!(w.body(late).unwrap().velocity, Vector2D::ZERO);
    }

    #[test]
    fn momentum_is_conserved() {
        let mut w = world();
        w.add(object(30.0, 0.0, 0.0)).unwrap();
        w.add(object(2.0, 12.0, 0.0)).unwrap();
        w.add(object(5.0, -4.0, 9.0)).unwrap();
        if let Some(o) = w.get_mut(BodyId(1)) {
            o.body.velocity = Vector2D::new(0.0, 1.5);
        }
        let before = w.stats().momentum;
        for _ in 0..500 {
            w.step(0.01);
        }
        let after = w.stats().momentum;
        assert!((after - before).length() < 1e-8, "{:?} -> {:?}", before, after);
    }

    #[test]
    fn for_each_visits_everything() {
        let mut w = world();
        w.add(object(1.0, 0.0, 0.0)).unwrap();
        w.add(object(1.0, 1.0, 0.0)).unwrap();
        let mut seen = Vec::new();
        w.for_each(|id, o| seen.push((id, o.body.position.x)));
        assert_eq!(seen, vec![(BodyId(0), 0.0), (BodyId(1), 1.0)]);
    }
}
