mod particle;
mod rigid_body;

pub use self::particle::Particle;
pub use self::rigid_body::RigidBody;

/// Flags for controlling body behavior
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling the behavior of rigid bodies
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct BodyFlags: u32 {
            /// Body is integrated each frame; cleared when asleep
            const AWAKE = 0x01;

            /// Body may be put to sleep when its motion stays low
            const CAN_SLEEP = 0x02;
        }
    }
}
