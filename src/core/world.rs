use crate::bodies::RigidBody;
use crate::collision::{Contact, ContactGenerator, ContactResolver};
use crate::core::{BodyHandle, BodyStorage, SimulationConfig};
use crate::forces::{ForceGenerator, ForceRegistry};
use crate::Result;
use log::{debug, warn};

/// An independent simulation of rigid body physics. Keeps track of a set of
/// bodies and provides the means to advance them all through time.
///
/// The host drives the world with exactly two calls per fixed timestep, in
/// order: [`start_frame`](World::start_frame) and
/// [`run_physics`](World::run_physics). Body state must not be mutated
/// between the two, since force accumulators are only valid inside that
/// window.
pub struct World {
    /// All rigid bodies registered with the world
    bodies: BodyStorage<RigidBody>,

    /// Registered (body, force generator) pairs
    registry: ForceRegistry,

    /// Resolver for the frame's contacts
    resolver: ContactResolver,

    /// Registered contact generators, invoked in registration order
    contact_generators: Vec<Box<dyn ContactGenerator>>,

    /// Shared contact buffer, allocated once and overwritten every frame.
    /// Its capacity never changes; generation truncates instead of growing.
    contacts: Vec<Contact>,

    /// Simulation parameters
    config: SimulationConfig,

    /// True when the resolver budget is derived from the contact count each
    /// frame instead of being fixed by the configuration
    calculate_iterations: bool,
}

impl World {
    /// Creates a new world with default configuration
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Creates a new world with the given configuration
    pub fn with_config(config: SimulationConfig) -> Self {
        let calculate_iterations = config.contact_iterations == 0;
        Self {
            bodies: BodyStorage::new(),
            registry: ForceRegistry::new(),
            resolver: ContactResolver::new(config.contact_iterations),
            contact_generators: Vec::new(),
            contacts: Vec::with_capacity(config.max_contacts),
            config,
            calculate_iterations,
        }
    }

    /// Returns the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Registers a body with the world and returns its handle. The body
    /// adopts the world's sleep-energy threshold.
    pub fn add_body(&mut self, mut body: RigidBody) -> BodyHandle {
        body.set_sleep_epsilon(self.config.sleep_epsilon);
        if body.is_awake() {
            // Re-seed the motion estimate against this world's threshold so
            // the body cannot fall asleep on its first frame.
            body.set_awake(true);
        }
        self.bodies.add(body)
    }

    /// Removes a body from the world, returning it intact. Force
    /// registrations targeting the body are dropped.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        self.registry.remove_for_body(handle);
        self.bodies.remove(handle).ok_or_else(|| {
            crate::error::PhysicsError::ResourceNotFound(format!(
                "Body with handle {:?} not found",
                handle
            ))
        })
    }

    /// Gets a reference to a body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies.get_body(handle)
    }

    /// Gets a mutable reference to a body by its handle
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies.get_body_mut(handle)
    }

    /// Returns the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Registers a force generator against a body
    pub fn add_force_generator(&mut self, body: BodyHandle, generator: Box<dyn ForceGenerator>) {
        self.registry.add(body, generator);
    }

    /// Removes all force registrations targeting a body; the body itself is
    /// unaffected
    pub fn remove_force_generators_for_body(&mut self, body: BodyHandle) {
        self.registry.remove_for_body(body);
    }

    /// Returns the force registry
    pub fn force_registry(&self) -> &ForceRegistry {
        &self.registry
    }

    /// Returns the force registry mutably
    pub fn force_registry_mut(&mut self) -> &mut ForceRegistry {
        &mut self.registry
    }

    /// Registers a contact generator
    pub fn add_contact_generator(&mut self, generator: Box<dyn ContactGenerator>) {
        self.contact_generators.push(generator);
    }

    /// Removes a contact generator by index, returning it
    pub fn remove_contact_generator(&mut self, index: usize) -> Option<Box<dyn ContactGenerator>> {
        if index < self.contact_generators.len() {
            Some(self.contact_generators.remove(index))
        } else {
            None
        }
    }

    /// Returns the contact resolver, for diagnostics
    pub fn resolver(&self) -> &ContactResolver {
        &self.resolver
    }

    /// Returns the sleep-energy threshold applied to all bodies
    pub fn get_sleep_epsilon(&self) -> f32 {
        self.config.sleep_epsilon
    }

    /// Sets the sleep-energy threshold, applying it to every registered body
    pub fn set_sleep_epsilon(&mut self, sleep_epsilon: f32) {
        self.config.sleep_epsilon = sleep_epsilon;
        for (_, body) in self.bodies.iter_mut() {
            body.set_sleep_epsilon(sleep_epsilon);
        }
    }

    /// Initialises the world for a simulation frame: clears every body's
    /// force and torque accumulators and recomputes derived data, so no
    /// stale transform from the previous frame can be observed mid-frame.
    /// After this call the bodies can have their forces for the frame added.
    pub fn start_frame(&mut self) {
        for (_, body) in self.bodies.iter_mut() {
            body.clear_accumulators();
            body.calculate_derived_data();
        }
    }

    /// Calls each registered contact generator in turn to report its
    /// contacts, and returns the number generated. Once the buffer is full,
    /// remaining generators are skipped for the frame; the loss is bounded
    /// and the next frame recomputes from scratch.
    pub fn generate_contacts(&mut self) -> usize {
        let max_contacts = self.config.max_contacts;
        self.contacts.clear();

        for (index, generator) in self.contact_generators.iter().enumerate() {
            let limit = max_contacts - self.contacts.len();
            if limit == 0 {
                warn!(
                    "contact buffer full ({} contacts); skipping {} remaining generators",
                    max_contacts,
                    self.contact_generators.len() - index
                );
                break;
            }
            let used = generator.add_contacts(&self.bodies, &mut self.contacts, limit);
            debug_assert!(used <= limit);
            // A generator that ignores its limit must not grow the buffer.
            self.contacts.truncate(max_contacts);
        }

        self.contacts.len()
    }

    /// Processes all the physics for the world: applies registered force
    /// generators, integrates every body, generates contacts, and resolves
    /// them.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is not positive.
    pub fn run_physics(&mut self, dt: f32) {
        assert!(dt > 0.0);

        self.registry.update_forces(&mut self.bodies, dt);

        for (_, body) in self.bodies.iter_mut() {
            body.integrate(dt);
        }

        let used_contacts = self.generate_contacts();

        if used_contacts > 0 {
            if self.calculate_iterations {
                // Rigid bodies couple through torque as well, so give the
                // resolver more headroom than the particle world does.
                self.resolver.set_iterations(used_contacts as u32 * 4);
            }
            self.resolver
                .resolve_contacts(&self.contacts, &mut self.bodies, dt);
            debug!(
                "resolved {} contacts in {} iterations",
                used_contacts,
                self.resolver.get_iterations_used()
            );
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
