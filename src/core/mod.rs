pub mod config;
pub mod storage;
pub mod world;
pub mod particle_world;

pub use self::config::SimulationConfig;
pub use self::particle_world::ParticleWorld;
pub use self::storage::BodyStorage;
pub use self::world::World;

/// A unique identifier for a body registered with a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u32);

/// Type alias for a handle to a particle
pub type ParticleHandle = BodyHandle;

/// Default kinetic energy under which a rigid body may be put to sleep.
/// Suitable when gravity is around 10-20 units per second squared and masses
/// are around one; simulations far from that scale should tune it through
/// [`World::set_sleep_epsilon`](crate::World::set_sleep_epsilon).
pub const DEFAULT_SLEEP_EPSILON: f32 = 0.3;
