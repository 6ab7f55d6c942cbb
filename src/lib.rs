pub mod math;
pub mod core;
pub mod bodies;
pub mod forces;
pub mod collision;

/// Re-export common types for easier usage
pub use crate::bodies::{Particle, RigidBody};
pub use crate::collision::{Contact, ContactResolver, ParticleContact, ParticleContactResolver};
pub use crate::core::{BodyHandle, ParticleHandle, ParticleWorld, SimulationConfig, World};
pub use crate::math::{Matrix3, Matrix4, Quaternion, Vector3};

/// Error types for the physics engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum PhysicsError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),
    }
}

/// Result type for physics engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
