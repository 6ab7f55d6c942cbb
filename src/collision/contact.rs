use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage};
use crate::collision::VELOCITY_EPSILON;
use crate::math::Vector3;

/// Two rigid bodies in contact. Resolving a contact removes their
/// interpenetration and applies sufficient impulse to keep them apart;
/// colliding bodies may also rebound.
///
/// A contact only holds the contact details; it is built fresh into the
/// world's contact buffer every frame and never persisted. Resolution is
/// driven by [`ContactResolver`].
#[derive(Debug, Clone)]
pub struct Contact {
    /// First body involved in the contact
    pub body_a: BodyHandle,

    /// Second body involved in the contact; `None` when colliding with
    /// immovable scenery
    pub body_b: Option<BodyHandle>,

    /// Direction of the contact in world coordinates, unit length, pointing
    /// from the second body towards the first
    pub normal: Vector3,

    /// Depth of penetration at the contact, non-negative
    pub penetration: f32,

    /// Normal restitution coefficient at the contact, in [0, 1]
    pub restitution: f32,
}

impl Contact {
    /// Creates a new contact against another body (or scenery when `body_b`
    /// is `None`)
    pub fn new(
        body_a: BodyHandle,
        body_b: Option<BodyHandle>,
        normal: Vector3,
        penetration: f32,
        restitution: f32,
    ) -> Self {
        Self {
            body_a,
            body_b,
            normal,
            penetration,
            restitution,
        }
    }

    /// Calculates the separating velocity at this contact. Negative means
    /// the bodies are closing, positive that they are separating.
    pub fn separating_velocity(&self, bodies: &BodyStorage<RigidBody>) -> f32 {
        let mut relative_velocity = match bodies.get(self.body_a) {
            Some(body) => body.get_velocity(),
            None => return 0.0,
        };
        if let Some(handle) = self.body_b {
            if let Some(body) = bodies.get(handle) {
                relative_velocity -= body.get_velocity();
            }
        }
        relative_velocity.dot(&self.normal)
    }

    /// Resolves this contact for both velocity and interpenetration.
    /// Interpenetration runs second so its positional correction cannot
    /// reintroduce closing velocity.
    pub(crate) fn resolve(&self, bodies: &mut BodyStorage<RigidBody>, dt: f32) {
        self.resolve_velocity(bodies, dt);
        self.resolve_interpenetration(bodies);
    }

    /// Handles the impulse calculations for this collision
    fn resolve_velocity(&self, bodies: &mut BodyStorage<RigidBody>, dt: f32) {
        let separating_velocity = self.separating_velocity(bodies);

        if separating_velocity >= 0.0 {
            // Already separating or stationary; no impulse required.
            return;
        }

        let mut new_sep_velocity = -separating_velocity * self.restitution;

        // Closing velocity built up by acceleration over exactly this frame
        // produces no rebound; removing it keeps resting contacts still.
        let mut acc_caused_velocity = match bodies.get(self.body_a) {
            Some(body) => body.get_last_frame_acceleration(),
            None => return,
        };
        if let Some(handle) = self.body_b {
            if let Some(body) = bodies.get(handle) {
                acc_caused_velocity -= body.get_last_frame_acceleration();
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

        let total_inverse_mass = self.total_inverse_mass(bodies);
        if total_inverse_mass <= 0.0 {
            // Both bodies are immovable; impulses have no effect.
            return;
        }

        let impulse = delta_velocity / total_inverse_mass;
        let impulse_per_imass = self.normal * impulse;

        if let Some(body) = bodies.get_mut(self.body_a) {
            let velocity = body.get_velocity() + impulse_per_imass * body.get_inverse_mass();
            body.set_velocity(velocity);
        }
        if let Some(handle) = self.body_b {
            if let Some(body) = bodies.get_mut(handle) {
                let velocity = body.get_velocity() - impulse_per_imass * body.get_inverse_mass();
                body.set_velocity(velocity);
            }
        }
    }

    /// Handles the interpenetration resolution for this contact. Changes
    /// positions only, never velocities.
    fn resolve_interpenetration(&self, bodies: &mut BodyStorage<RigidBody>) {
        if self.penetration <= 0.0 {
            return;
        }

        let total_inverse_mass = self.total_inverse_mass(bodies);
        if total_inverse_mass <= 0.0 {
            return;
        }

        let move_per_imass = self.normal * (-self.penetration / total_inverse_mass);

        if let Some(body) = bodies.get_mut(self.body_a) {
            let position = body.get_position() + move_per_imass * body.get_inverse_mass();
            body.set_position(position);
        }
        if let Some(handle) = self.body_b {
            if let Some(body) = bodies.get_mut(handle) {
                let position = body.get_position() - move_per_imass * body.get_inverse_mass();
                body.set_position(position);
            }
        }
    }

    fn total_inverse_mass(&self, bodies: &BodyStorage<RigidBody>) -> f32 {
        let mut total = match bodies.get(self.body_a) {
            Some(body) => body.get_inverse_mass(),
            None => 0.0,
        };
        if let Some(handle) = self.body_b {
            if let Some(body) = bodies.get(handle) {
                total += body.get_inverse_mass();
            }
        }
        total
    }
}

/// Iterative impulse resolver for a set of rigid body contacts.
///
/// Each iteration re-scores every contact's separating velocity, since
/// resolving one contact can change another sharing a participant, and
/// resolves only the worst (most negative) one. This worst-first policy is
/// what makes contact chains converge; a single in-order pass over the
/// buffer does not.
#[derive(Debug, Clone)]
pub struct ContactResolver {
    /// Maximum number of single-contact resolutions per call
    iterations: u32,

    /// Number of iterations actually used by the last call, for diagnostics
    iterations_used: u32,
}

impl ContactResolver {
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
        contacts: &[Contact],
        bodies: &mut BodyStorage<RigidBody>,
        dt: f32,
    ) {
        self.iterations_used = 0;
        while self.iterations_used < self.iterations {
            // Find the contact with the largest closing velocity.
            let mut max = 0.0;
            let mut max_index = contacts.len();
            for (i, contact) in contacts.iter().enumerate() {
                let sep_velocity = contact.separating_velocity(bodies);
                if sep_velocity < max {
                    max = sep_velocity;
                    max_index = i;
                }
            }

            if max_index == contacts.len() || max.abs() < VELOCITY_EPSILON {
                break;
            }

            contacts[max_index].resolve(bodies, dt);
            self.iterations_used += 1;
        }
    }
}
