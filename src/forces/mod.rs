mod drag;
mod force_generator;
mod gravity;
mod spring;

pub use self::drag::{Drag, ParticleDrag};
pub use self::force_generator::{
    ForceGenerator, ForceRegistration, ForceRegistry, ParticleForceGenerator,
    ParticleForceRegistration, ParticleForceRegistry,
};
pub use self::gravity::{Gravity, ParticleGravity};
pub use self::spring::{ParticleAnchoredSpring, ParticleBungee, ParticleSpring, Spring};
