use crate::bodies::{Particle, RigidBody};
use crate::core::{BodyHandle, BodyStorage, ParticleHandle};
use crate::collision::{Contact, ParticleContact};
use crate::math::Vector3;

/// Margin subtracted from reported penetration so bodies settle slightly
/// overlapped instead of jittering on the contact boundary
pub const PENETRATION_SLOP: f32 = 0.01;

/// Capability for reporting rigid body contacts into the world's buffer.
///
/// A generator writes at most `limit` contacts and returns how many it
/// wrote; the world hands each generator the remaining capacity of the
/// shared buffer.
pub trait ContactGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Appends this generator's contacts to the buffer, up to `limit`
    fn add_contacts(
        &self,
        bodies: &BodyStorage<RigidBody>,
        contacts: &mut Vec<Contact>,
        limit: usize,
    ) -> usize;
}

/// Capability for reporting particle contacts into the world's buffer
pub trait ParticleContactGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Appends this generator's contacts to the buffer, up to `limit`
    fn add_contacts(
        &self,
        particles: &BodyStorage<Particle>,
        contacts: &mut Vec<ParticleContact>,
        limit: usize,
    ) -> usize;
}

/// Axis-aligned separation for a pair of equally sized cubes: picks the axis
/// of least overlap, with the normal sign taken from the centre delta on
/// that axis. Returns `None` when the cubes are separated on any axis.
fn cube_pair_contact(
    pos_a: Vector3,
    pos_b: Vector3,
    half_extent: f32,
) -> Option<(Vector3, f32)> {
    let delta = pos_a - pos_b;

    let overlap = Vector3::new(
        half_extent * 2.0 - delta.x.abs(),
        half_extent * 2.0 - delta.y.abs(),
        half_extent * 2.0 - delta.z.abs(),
    );

    if overlap.x < 0.0 || overlap.y < 0.0 || overlap.z < 0.0 {
        return None;
    }

    let mut min_penetration = overlap.x;
    let mut normal = Vector3::new(if delta.x > 0.0 { 1.0 } else { -1.0 }, 0.0, 0.0);

    if overlap.y < min_penetration {
        min_penetration = overlap.y;
        normal = Vector3::new(0.0, if delta.y > 0.0 { 1.0 } else { -1.0 }, 0.0);
    }

    if overlap.z < min_penetration {
        min_penetration = overlap.z;
        normal = Vector3::new(0.0, 0.0, if delta.z > 0.0 { 1.0 } else { -1.0 });
    }

    Some((normal, (min_penetration - PENETRATION_SLOP).max(0.0)))
}

/// Generates at most one contact between a pair of axis-aligned cubes of
/// equal size
#[derive(Debug, Clone)]
pub struct CubeContactGenerator {
    /// First cube body
    body_a: BodyHandle,

    /// Second cube body
    body_b: BodyHandle,

    /// Half of the cubes' edge length
    half_extent: f32,

    /// Restitution written into the generated contact
    restitution: f32,
}

impl CubeContactGenerator {
    /// Creates a generator for two cubes of the given edge length
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, cube_size: f32) -> Self {
        Self {
            body_a,
            body_b,
            half_extent: cube_size / 2.0,
            restitution: 1.0,
        }
    }

    /// Overrides the restitution written into generated contacts
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }
}

impl ContactGenerator for CubeContactGenerator {
    fn add_contacts(
        &self,
        bodies: &BodyStorage<RigidBody>,
        contacts: &mut Vec<Contact>,
        limit: usize,
    ) -> usize {
        if limit == 0 {
            return 0;
        }

        let pos_a = match bodies.get(self.body_a) {
            Some(body) => body.get_position(),
            None => return 0,
        };
        let pos_b = match bodies.get(self.body_b) {
            Some(body) => body.get_position(),
            None => return 0,
        };

        match cube_pair_contact(pos_a, pos_b, self.half_extent) {
            Some((normal, penetration)) => {
                contacts.push(Contact::new(
                    self.body_a,
                    Some(self.body_b),
                    normal,
                    penetration,
                    self.restitution,
                ));
                1
            }
            None => 0,
        }
    }
}

/// Generates a contact against immovable scenery whenever the target body
/// drops below a ground plane
#[derive(Debug, Clone)]
pub struct GroundContactGenerator {
    /// The body tested against the ground
    body: BodyHandle,

    /// Height of the ground plane along the y-axis
    height: f32,

    /// Restitution written into the generated contact
    restitution: f32,
}

impl GroundContactGenerator {
    /// Creates a generator keeping the given body above the given height
    pub fn new(body: BodyHandle, height: f32) -> Self {
        Self {
            body,
            height,
            restitution: 0.2,
        }
    }

    /// Overrides the restitution written into generated contacts
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }
}

impl ContactGenerator for GroundContactGenerator {
    fn add_contacts(
        &self,
        bodies: &BodyStorage<RigidBody>,
        contacts: &mut Vec<Contact>,
        limit: usize,
    ) -> usize {
        if limit == 0 {
            return 0;
        }

        let y = match bodies.get(self.body) {
            Some(body) => body.get_position().y,
            None => return 0,
        };

        if y >= self.height {
            return 0;
        }

        contacts.push(Contact::new(
            self.body,
            None,
            Vector3::unit_y(),
            self.height - y,
            self.restitution,
        ));
        1
    }
}

/// Generates at most one contact between a pair of axis-aligned particle
/// cubes of equal size
#[derive(Debug, Clone)]
pub struct ParticleCubeContactGenerator {
    /// First cube particle
    particle_a: ParticleHandle,

    /// Second cube particle
    particle_b: ParticleHandle,

    /// Half of the cubes' edge length
    half_extent: f32,

    /// Restitution written into the generated contact
    restitution: f32,
}

impl ParticleCubeContactGenerator {
    /// Creates a generator for two cubes of the given edge length
    pub fn new(particle_a: ParticleHandle, particle_b: ParticleHandle, cube_size: f32) -> Self {
        Self {
            particle_a,
            particle_b,
            half_extent: cube_size / 2.0,
            restitution: 1.0,
        }
    }

    /// Overrides the restitution written into generated contacts
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }
}

impl ParticleContactGenerator for ParticleCubeContactGenerator {
    fn add_contacts(
        &self,
        particles: &BodyStorage<Particle>,
        contacts: &mut Vec<ParticleContact>,
        limit: usize,
    ) -> usize {
        if limit == 0 {
            return 0;
        }

        let pos_a = match particles.get(self.particle_a) {
            Some(particle) => particle.get_position(),
            None => return 0,
        };
        let pos_b = match particles.get(self.particle_b) {
            Some(particle) => particle.get_position(),
            None => return 0,
        };

        match cube_pair_contact(pos_a, pos_b, self.half_extent) {
            Some((normal, penetration)) => {
                contacts.push(ParticleContact::new(
                    self.particle_a,
                    Some(self.particle_b),
                    normal,
                    penetration,
                    self.restitution,
                ));
                1
            }
            None => 0,
        }
    }
}

/// Generates a contact against immovable scenery whenever the target
/// particle drops below a ground plane
#[derive(Debug, Clone)]
pub struct ParticleGroundContactGenerator {
    /// The particle tested against the ground
    particle: ParticleHandle,

    /// Height of the ground plane along the y-axis
    height: f32,

    /// Restitution written into the generated contact
    restitution: f32,
}

impl ParticleGroundContactGenerator {
    /// Creates a generator keeping the given particle above the given height
    pub fn new(particle: ParticleHandle, height: f32) -> Self {
        Self {
            particle,
            height,
            restitution: 0.2,
        }
    }

    /// Overrides the restitution written into generated contacts
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }
}

impl ParticleContactGenerator for ParticleGroundContactGenerator {
    fn add_contacts(
        &self,
        particles: &BodyStorage<Particle>,
        contacts: &mut Vec<ParticleContact>,
        limit: usize,
    ) -> usize {
        if limit == 0 {
            return 0;
        }

        let y = match particles.get(self.particle) {
            Some(particle) => particle.get_position().y,
            None => return 0,
        };

        if y >= self.height {
            return 0;
        }

        contacts.push(ParticleContact::new(
            self.particle,
            None,
            Vector3::unit_y(),
            self.height - y,
            self.restitution,
        ));
        1
    }
}
