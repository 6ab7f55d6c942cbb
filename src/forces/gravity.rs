use crate::bodies::{Particle, RigidBody};
use crate::core::{BodyHandle, BodyStorage, ParticleHandle};
use crate::forces::{ForceGenerator, ParticleForceGenerator};
use crate::math::Vector3;

/// A force generator that applies a constant gravitational force to a rigid
/// body, scaled by the body's mass
#[derive(Debug, Clone)]
pub struct Gravity {
    /// The gravitational acceleration vector
    gravity: Vector3,
}

impl Gravity {
    /// Creates a new gravity generator with the given acceleration
    pub fn new(gravity: Vector3) -> Self {
        Self { gravity }
    }

    /// Creates a gravity generator with Earth-like acceleration along the
    /// negative y-axis
    pub fn earth() -> Self {
        Self::new(Vector3::GRAVITY)
    }

    /// Returns the gravitational acceleration
    pub fn get_gravity(&self) -> Vector3 {
        self.gravity
    }

    /// Sets the gravitational acceleration
    pub fn set_gravity(&mut self, gravity: Vector3) {
        self.gravity = gravity;
    }
}

impl ForceGenerator for Gravity {
    fn generator_type(&self) -> &'static str {
        "Gravity"
    }

    fn update_force(&self, target: BodyHandle, bodies: &mut BodyStorage<RigidBody>, _dt: f32) {
        let body = match bodies.get_mut(target) {
            Some(body) => body,
            None => return,
        };

        if !body.has_finite_mass() {
            return;
        }

        body.add_force(self.gravity * body.get_mass());
    }
}

/// A force generator that applies a constant gravitational force to a
/// particle, scaled by the particle's mass
#[derive(Debug, Clone)]
pub struct ParticleGravity {
    /// The gravitational acceleration vector
    gravity: Vector3,
}

impl ParticleGravity {
    /// Creates a new gravity generator with the given acceleration
    pub fn new(gravity: Vector3) -> Self {
        Self { gravity }
    }

    /// Returns the gravitational acceleration
    pub fn get_gravity(&self) -> Vector3 {
        self.gravity
    }

    /// Sets the gravitational acceleration
    pub fn set_gravity(&mut self, gravity: Vector3) {
        self.gravity = gravity;
    }
}

impl ParticleForceGenerator for ParticleGravity {
    fn generator_type(&self) -> &'static str {
        "ParticleGravity"
    }

    fn update_force(
        &self,
        target: ParticleHandle,
        particles: &mut BodyStorage<Particle>,
        _dt: f32,
    ) {
        let particle = match particles.get_mut(target) {
            Some(particle) => particle,
            None => return,
        };

        // Tested against the inverse mass rather than through
        // `has_finite_mass`, whose polarity differs from the rigid body
        // variant. Immovable particles take no gravity.
        if particle.get_inverse_mass() <= 0.0 {
            return;
        }

        particle.add_force(self.gravity * particle.get_mass());
    }
}
