use crate::bodies::{Particle, RigidBody};
use crate::core::{BodyHandle, BodyStorage, ParticleHandle};
use crate::forces::{ForceGenerator, ParticleForceGenerator};
use crate::math::Vector3;

/// A Hookean spring between anchor points on two rigid bodies.
///
/// The force is applied to the target at its local anchor, directed to
/// reduce the extension of the spring; the other body is left to its own
/// registration for the reaction force.
#[derive(Debug, Clone)]
pub struct Spring {
    /// Anchor point on the target body, in its local space
    connection_point: Vector3,

    /// The body the other end of the spring connects to
    other: BodyHandle,

    /// Anchor point on the other body, in its local space
    other_connection_point: Vector3,

    /// Spring stiffness
    spring_constant: f32,

    /// Natural length of the spring
    rest_length: f32,
}

impl Spring {
    /// Creates a new spring between the given local anchor points
    pub fn new(
        connection_point: Vector3,
        other: BodyHandle,
        other_connection_point: Vector3,
        spring_constant: f32,
        rest_length: f32,
    ) -> Self {
        Self {
            connection_point,
            other,
            other_connection_point,
            spring_constant,
            rest_length,
        }
    }

    /// Returns the spring stiffness
    pub fn get_spring_constant(&self) -> f32 {
        self.spring_constant
    }

    /// Returns the natural length of the spring
    pub fn get_rest_length(&self) -> f32 {
        self.rest_length
    }
}

impl ForceGenerator for Spring {
    fn generator_type(&self) -> &'static str {
        "Spring"
    }

    fn update_force(&self, target: BodyHandle, bodies: &mut BodyStorage<RigidBody>, _dt: f32) {
        // World-space anchor on the other body, read before mutably
        // borrowing the target.
        let ows = match bodies.get(self.other) {
            Some(body) => body.get_point_in_world_space(self.other_connection_point),
            None => return,
        };

        let body = match bodies.get_mut(target) {
            Some(body) => body,
            None => return,
        };
        let lws = body.get_point_in_world_space(self.connection_point);

        let mut force = lws - ows;

        let mut magnitude = force.length();
        magnitude = (magnitude - self.rest_length).abs();
        magnitude *= self.spring_constant;

        force.normalize_mut();
        force *= -magnitude;
        body.add_force_at_point(force, lws);
    }
}

/// A Hookean spring between two particles
#[derive(Debug, Clone)]
pub struct ParticleSpring {
    /// The particle at the other end of the spring
    other: ParticleHandle,

    /// Spring stiffness
    spring_constant: f32,

    /// Natural length of the spring
    rest_length: f32,
}

impl ParticleSpring {
    /// Creates a new spring to the given particle
    pub fn new(other: ParticleHandle, spring_constant: f32, rest_length: f32) -> Self {
        Self {
            other,
            spring_constant,
            rest_length,
        }
    }
}

impl ParticleForceGenerator for ParticleSpring {
    fn generator_type(&self) -> &'static str {
        "ParticleSpring"
    }

    fn update_force(
        &self,
        target: ParticleHandle,
        particles: &mut BodyStorage<Particle>,
        _dt: f32,
    ) {
        let other_position = match particles.get(self.other) {
            Some(particle) => particle.get_position(),
            None => return,
        };

        let particle = match particles.get_mut(target) {
            Some(particle) => particle,
            None => return,
        };

        let mut force = particle.get_position() - other_position;

        let mut magnitude = force.length();
        magnitude = (magnitude - self.rest_length).abs();
        magnitude *= self.spring_constant;

        force.normalize_mut();
        force *= -magnitude;
        particle.add_force(force);
    }
}

/// A Hookean spring between a particle and a fixed point in world space
#[derive(Debug, Clone)]
pub struct ParticleAnchoredSpring {
    /// The fixed end of the spring in world space
    anchor: Vector3,

    /// Spring stiffness
    spring_constant: f32,

    /// Natural length of the spring
    rest_length: f32,
}

impl ParticleAnchoredSpring {
    /// Creates a new spring to the given world-space anchor
    pub fn new(anchor: Vector3, spring_constant: f32, rest_length: f32) -> Self {
        Self {
            anchor,
            spring_constant,
            rest_length,
        }
    }

    /// Returns the anchor point
    pub fn get_anchor(&self) -> Vector3 {
        self.anchor
    }

    /// Moves the anchor point
    pub fn set_anchor(&mut self, anchor: Vector3) {
        self.anchor = anchor;
    }
}

impl ParticleForceGenerator for ParticleAnchoredSpring {
    fn generator_type(&self) -> &'static str {
        "ParticleAnchoredSpring"
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

        let mut force = particle.get_position() - self.anchor;

        let mut magnitude = force.length();
        magnitude = (magnitude - self.rest_length).abs();
        magnitude *= self.spring_constant;

        force.normalize_mut();
        force *= -magnitude;
        particle.add_force(force);
    }
}

/// A one-sided elastic between two particles: pulls like a spring when
/// stretched beyond its rest length, applies no force while slack
#[derive(Debug, Clone)]
pub struct ParticleBungee {
    /// The particle at the other end of the bungee
    other: ParticleHandle,

    /// Bungee stiffness
    spring_constant: f32,

    /// Length below which the bungee goes slack
    rest_length: f32,
}

impl ParticleBungee {
    /// Creates a new bungee to the given particle
    pub fn new(other: ParticleHandle, spring_constant: f32, rest_length: f32) -> Self {
        Self {
            other,
            spring_constant,
            rest_length,
        }
    }
}

impl ParticleForceGenerator for ParticleBungee {
    fn generator_type(&self) -> &'static str {
        "ParticleBungee"
    }

    fn update_force(
        &self,
        target: ParticleHandle,
        particles: &mut BodyStorage<Particle>,
        _dt: f32,
    ) {
        let other_position = match particles.get(self.other) {
            Some(particle) => particle.get_position(),
            None => return,
        };

        let particle = match particles.get_mut(target) {
            Some(particle) => particle,
            None => return,
        };

        let mut force = particle.get_position() - other_position;

        let mut magnitude = force.length();
        if magnitude < self.rest_length {
            return;
        }
        magnitude = (magnitude - self.rest_length) * self.spring_constant;

        force.normalize_mut();
        force *= -magnitude;
        particle.add_force(force);
    }
}
