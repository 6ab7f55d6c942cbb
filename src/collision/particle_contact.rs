use crate::bodies::Particle;
use crate::core::{BodyStorage, ParticleHandle};
use crate::collision::VELOCITY_EPSILON;
use crate::math::Vector3;

/// Two particles in contact, or one particle against immovable scenery.
/// Holds the contact details only; resolution is driven by
/// [`ParticleContactResolver`].
#[derive(Debug, Clone)]
pub struct ParticleContact {
    /// First particle involved in the contact
    pub particle_a: ParticleHandle,

    /// Second particle involved in the contact; `None` when colliding with
    /// immovable scenery
    pub particle_b: Option<ParticleHandle>,

    /// Direction of the contact in world coordinates, unit length
    pub normal: Vector3,

    /// Depth of penetration at the contact, non-negative
    pub penetration: f32,

    /// Normal restitution coefficient at the contact, in [0, 1]
    pub restitution: f32,
}

impl ParticleContact {
    /// Creates a new contact
    pub fn new(
        particle_a: ParticleHandle,
        particle_b: Option<ParticleHandle>,
        normal: Vector3,
        penetration: f32,
        restitution: f32,
    ) -> Self {
        Self {
            particle_a,
            particle_b,
            normal,
            penetration,
            restitution,
        }
    }

    /// Calculates the separating velocity at this contact
    pub fn separating_velocity(&self, particles: &BodyStorage<Particle>) -> f32 {
        let mut relative_velocity = match particles.get(self.particle_a) {
            Some(particle) => particle.get_velocity(),
            None => return 0.0,
        };
        if let Some(handle) = self.particle_b {
            if let Some(particle) = particles.get(handle) {
                relative_velocity -= particle.get_velocity();
            }
        }
        relative_velocity.dot(&self.normal)
    }

    /// Resolves this contact for both velocity and interpenetration
    pub(crate) fn resolve(&self, particles: &mut BodyStorage<Particle>, dt: f32) {
        self.resolve_velocity(particles, dt);
        self.resolve_interpenetration(particles);
    }

    fn resolve_velocity(&self, particles: &mut BodyStorage<Particle>, dt: f32) {
        let separating_velocity = self.separating_velocity(particles);

        if separating_velocity >= 0.0 {
            return;
        }

        let mut new_sep_velocity = -separating_velocity * self.restitution;

        // Strip the closing velocity that this frame's acceleration alone
        // built up, so resting contacts do not vibrate.
        let mut acc_caused_velocity = match particles.get(self.particle_a) {
            Some(particle) => particle.get_acceleration(),
            None => return,
        };
        if let Some(handle) = self.particle_b {
            if let Some(particle) = particles.get(handle) {
                acc_caused_velocity -= particle.get_acceleration();
            }
        }
        let acc_caused_sep_velocity = acc_caused_velocity.dot(&self.normal) * dt;

        if acc_caused_sep_velocity < 0.0 {
            new_sep_velocity += self.restitution * acc_caused_sep_velocity;
            if new_sep_velocity < 0.0 {
                new_sep_velocity = 0.0;
            }
        }

        let delta_velocity = new_sep_velocity - separating_velocity;

        let total_inverse_mass = self.total_inverse_mass(particles);
        if total_inverse_mass <= 0.0 {
            return;
        }

        let impulse = delta_velocity / total_inverse_mass;
        let impulse_per_imass = self.normal * impulse;

        if let Some(particle) = particles.get_mut(self.particle_a) {
            let velocity =
                particle.get_velocity() + impulse_per_imass * particle.get_inverse_mass();
            particle.set_velocity(velocity);
        }
        if let Some(handle) = self.particle_b {
            if let Some(particle) = particles.get_mut(handle) {
                let velocity =
                    particle.get_velocity() - impulse_per_imass * particle.get_inverse_mass();
                particle.set_velocity(velocity);
            }
        }
    }

    fn resolve_interpenetration(&self, particles: &mut BodyStorage<Particle>) {
        if self.penetration <= 0.0 {
            return;
        }

        let total_inverse_mass = self.total_inverse_mass(particles);
        if total_inverse_mass <= 0.0 {
            return;
        }

        let move_per_imass = self.normal * (-self.penetration / total_inverse_mass);

        if let Some(particle) = particles.get_mut(self.particle_a) {
            let position =
                particle.get_position() + move_per_imass * particle.get_inverse_mass();
            particle.set_position(position);
        }
        if let Some(handle) = self.particle_b {
            if let Some(particle) = particles.get_mut(handle) {
                let position =
                    particle.get_position() - move_per_imass * particle.get_inverse_mass();
                particle.set_position(position);
            }
        }
    }

    fn total_inverse_mass(&self, particles: &BodyStorage<Particle>) -> f32 {
        let mut total = match particles.get(self.particle_a) {
            Some(particle) => particle.get_inverse_mass(),
            None => 0.0,
        };
        if let Some(handle) = self.particle_b {
            if let Some(particle) = particles.get(handle) {
                total += particle.get_inverse_mass();
            }
        }
        total
    }
}

/// Iterative impulse resolver for particle contacts. Re-scores every contact
/// each iteration and resolves the worst one; see
/// [`ContactResolver`](crate::collision::ContactResolver) for the policy.
#[derive(Debug, Clone)]
pub struct ParticleContactResolver {
    /// Maximum number of single-contact resolutions per call
    iterations: u32,

    /// Number of iterations actually used by the last call, for diagnostics
    iterations_used: u32,
}

impl ParticleContactResolver {
    /// Creates a new resolver with the given iteration budget
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            iterations_used: 0,
        }
    }

    /// Sets the iteration budget
    pub fn set_iterations(&mut self, iterations: u32) {
        self.iterations = iterations;
    }

    /// Returns the iteration budget
    pub fn get_iterations(&self) -> u32 {
        self.iterations
    }

    /// Returns the number of iterations used by the last resolution
    pub fn get_iterations_used(&self) -> u32 {
        self.iterations_used
    }

    /// Resolves the given contacts for both velocity and interpenetration
    pub fn resolve_contacts(
        &mut self,
        contacts: &[ParticleContact],
        particles: &mut BodyStorage<Particle>,
        dt: f32,
    ) {
        self.iterations_used = 0;
        while self.iterations_used < self.iterations {
            let mut max = 0.0;
            let mut max_index = contacts.len();
            for (i, contact) in contacts.iter().enumerate() {
                let sep_velocity = contact.separating_velocity(particles);
                if sep_velocity < max {
                    max = sep_velocity;
                    max_index = i;
                }
            }

            if max_index == contacts.len() || max.abs() < VELOCITY_EPSILON {
                break;
            }

            contacts[max_index].resolve(particles, dt);
            self.iterations_used += 1;
        }
    }
}
