use crate::core::DEFAULT_SLEEP_EPSILON;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Configuration parameters for a simulation world
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Capacity of the per-frame contact buffer; fixed for the lifetime of
    /// the world. Generators that would exceed it are skipped for the frame.
    pub max_contacts: usize,

    /// Fixed iteration budget for the contact resolver. Zero means the
    /// budget is derived each frame from the number of generated contacts
    /// (twice the count for particle worlds, four times for rigid-body
    /// worlds, where torque coupling needs more iterations to converge).
    pub contact_iterations: u32,

    /// Kinetic energy under which rigid bodies are put to sleep. Applies
    /// uniformly to every body registered with the world.
    pub sleep_epsilon: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_contacts: 256,
            contact_iterations: 0,
            sleep_epsilon: DEFAULT_SLEEP_EPSILON,
        }
    }
}
