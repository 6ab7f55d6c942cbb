use crate::bodies::{Particle, RigidBody};
use crate::core::{BodyHandle, BodyStorage, ParticleHandle};

/// Capability for applying forces to a rigid body each frame.
///
/// A generator mutates only the target's force and torque accumulators,
/// never its position or velocity directly. The whole storage is passed in
/// so generators spanning two bodies (springs) can read their other end.
pub trait ForceGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the type name of the force generator
    fn generator_type(&self) -> &'static str;

    /// Accumulates this generator's force on the target body
    fn update_force(&self, target: BodyHandle, bodies: &mut BodyStorage<RigidBody>, dt: f32);
}

/// Capability for applying forces to a particle each frame
pub trait ParticleForceGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the type name of the force generator
    fn generator_type(&self) -> &'static str;

    /// Accumulates this generator's force on the target particle
    fn update_force(
        &self,
        target: ParticleHandle,
        particles: &mut BodyStorage<Particle>,
        dt: f32,
    );
}

/// A (target, generator) pair held by the force registry
#[derive(Debug)]
pub struct ForceRegistration {
    /// The body the generator applies to
    pub body: BodyHandle,

    /// The generator to invoke
    pub generator: Box<dyn ForceGenerator>,
}

/// Registry of (body, force generator) pairs, invoked in registration order
/// exactly once per frame, strictly before integration.
#[derive(Debug, Default)]
pub struct ForceRegistry {
    registrations: Vec<ForceRegistration>,
}

impl ForceRegistry {
    /// Creates a new empty force registry
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Registers a generator against a body
    pub fn add(&mut self, body: BodyHandle, generator: Box<dyn ForceGenerator>) {
        self.registrations.push(ForceRegistration { body, generator });
    }

    /// Removes a registration by index, returning it intact. The target body
    /// is unaffected.
    pub fn remove(&mut self, index: usize) -> Option<ForceRegistration> {
        if index < self.registrations.len() {
            Some(self.registrations.remove(index))
        } else {
            None
        }
    }

    /// Removes all registrations targeting the given body
    pub fn remove_for_body(&mut self, body: BodyHandle) {
        self.registrations.retain(|registration| registration.body != body);
    }

    /// Returns the number of registrations
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Clears all registrations
    pub fn clear(&mut self) {
        self.registrations.clear();
    }

    /// Invokes every registered generator exactly once, in registration
    /// order
    pub fn update_forces(&self, bodies: &mut BodyStorage<RigidBody>, dt: f32) {
        for registration in &self.registrations {
            registration.generator.update_force(registration.body, bodies, dt);
        }
    }
}

/// A (target, generator) pair held by the particle force registry
#[derive(Debug)]
pub struct ParticleForceRegistration {
    /// The particle the generator applies to
    pub particle: ParticleHandle,

    /// The generator to invoke
    pub generator: Box<dyn ParticleForceGenerator>,
}

/// Registry of (particle, force generator) pairs, invoked in registration
/// order exactly once per frame, strictly before integration.
#[derive(Debug, Default)]
pub struct ParticleForceRegistry {
    registrations: Vec<ParticleForceRegistration>,
}

impl ParticleForceRegistry {
    /// Creates a new empty force registry
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Registers a generator against a particle
    pub fn add(&mut self, particle: ParticleHandle, generator: Box<dyn ParticleForceGenerator>) {
        self.registrations
            .push(ParticleForceRegistration { particle, generator });
    }

    /// Removes a registration by index, returning it intact. The target
    /// particle is unaffected.
    pub fn remove(&mut self, index: usize) -> Option<ParticleForceRegistration> {
        if index < self.registrations.len() {
            Some(self.registrations.remove(index))
        } else {
            None
        }
    }

    /// Removes all registrations targeting the given particle
    pub fn remove_for_particle(&mut self, particle: ParticleHandle) {
        self.registrations
            .retain(|registration| registration.particle != particle);
    }

    /// Returns the number of registrations
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Clears all registrations
    pub fn clear(&mut self) {
        self.registrations.clear();
    }

    /// Invokes every registered generator exactly once, in registration
    /// order
    pub fn update_forces(&self, particles: &mut BodyStorage<Particle>, dt: f32) {
        for registration in &self.registrations {
            registration
                .generator
                .update_force(registration.particle, particles, dt);
        }
    }
}
