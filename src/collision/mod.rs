mod broad_phase;
mod contact;
mod contact_generator;
mod particle_contact;

pub use self::broad_phase::BoundingSphere;
pub use self::contact::{Contact, ContactResolver};
pub use self::contact_generator::{
    ContactGenerator, CubeContactGenerator, GroundContactGenerator,
    ParticleContactGenerator, ParticleCubeContactGenerator, ParticleGroundContactGenerator,
    PENETRATION_SLOP,
};
pub use self::particle_contact::{ParticleContact, ParticleContactResolver};

/// Separating velocities smaller than this are treated as resting contact
/// and left for the interpenetration pass alone
pub const VELOCITY_EPSILON: f32 = 0.01;
