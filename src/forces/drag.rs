use crate::bodies::{Particle, RigidBody};
use crate::core::{BodyHandle, BodyStorage, ParticleHandle};
use crate::forces::{ForceGenerator, ParticleForceGenerator};

/// A force generator that applies velocity-dependent drag to a rigid body:
/// `f = -v_hat * (k1*|v| + k2*|v|^2)`
#[derive(Debug, Clone)]
pub struct Drag {
    /// Linear drag coefficient
    k1: f32,

    /// Quadratic drag coefficient
    k2: f32,
}

impl Drag {
    /// Creates a new drag generator with the given coefficients
    pub fn new(k1: f32, k2: f32) -> Self {
        Self { k1, k2 }
    }
}

impl ForceGenerator for Drag {
    fn generator_type(&self) -> &'static str {
        "Drag"
    }

    fn update_force(&self, target: BodyHandle, bodies: &mut BodyStorage<RigidBody>, _dt: f32) {
        let body = match bodies.get_mut(target) {
            Some(body) => body,
            None => return,
        };

        let mut force = body.get_velocity();

        let mut drag_coeff = force.length();
        drag_coeff = self.k1 * drag_coeff + self.k2 * drag_coeff * drag_coeff;

        force.normalize_mut();
        force *= -drag_coeff;
        body.add_force(force);
    }
}

/// A force generator that applies velocity-dependent drag to a particle
#[derive(Debug, Clone)]
pub struct ParticleDrag {
    /// Linear drag coefficient
    k1: f32,

    /// Quadratic drag coefficient
    k2: f32,
}

impl ParticleDrag {
    /// Creates a new drag generator with the given coefficients
    pub fn new(k1: f32, k2: f32) -> Self {
        Self { k1, k2 }
    }
}

impl ParticleForceGenerator for ParticleDrag {
    fn generator_type(&self) -> &'static str {
        "ParticleDrag"
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

        let mut force = particle.get_velocity();

        let mut drag_coeff = force.length();
        drag_coeff = self.k1 * drag_coeff + self.k2 * drag_coeff * drag_coeff;

        force.normalize_mut();
        force *= -drag_coeff;
        particle.add_force(force);
    }
}
