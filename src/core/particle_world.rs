use crate::bodies::Particle;
use crate::collision::{ParticleContact, ParticleContactGenerator, ParticleContactResolver};
use crate::core::{BodyStorage, ParticleHandle, SimulationConfig};
use crate::forces::{ParticleForceGenerator, ParticleForceRegistry};
use crate::Result;
use log::{debug, warn};

/// An independent simulation of particle physics: linear-only bodies with
/// the same frame protocol as [`World`](crate::World).
pub struct ParticleWorld {
    /// All particles registered with the world
    particles: BodyStorage<Particle>,

    /// Registered (particle, force generator) pairs
    registry: ParticleForceRegistry,

    /// Resolver for the frame's contacts
    resolver: ParticleContactResolver,

    /// Registered contact generators, invoked in registration order
    contact_generators: Vec<Box<dyn ParticleContactGenerator>>,

    /// Shared contact buffer, allocated once and overwritten every frame
    contacts: Vec<ParticleContact>,

    /// Simulation parameters
    config: SimulationConfig,

    /// True when the resolver budget is derived from the contact count each
    /// frame instead of being fixed by the configuration
    calculate_iterations: bool,
}

impl ParticleWorld {
    /// Creates a new particle world with default configuration
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Creates a new particle world with the given configuration
    pub fn with_config(config: SimulationConfig) -> Self {
        let calculate_iterations = config.contact_iterations == 0;
        Self {
            particles: BodyStorage::new(),
            registry: ParticleForceRegistry::new(),
            resolver: ParticleContactResolver::new(config.contact_iterations),
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

    /// Registers a particle with the world and returns its handle
    pub fn add_particle(&mut self, particle: Particle) -> ParticleHandle {
        self.particles.add(particle)
    }

    /// Removes a particle from the world, returning it intact. Force
    /// registrations targeting the particle are dropped.
    pub fn remove_particle(&mut self, handle: ParticleHandle) -> Result<Particle> {
        self.registry.remove_for_particle(handle);
        self.particles.remove(handle).ok_or_else(|| {
            crate::error::PhysicsError::ResourceNotFound(format!(
                "Particle with handle {:?} not found",
                handle
            ))
        })
    }

    /// Gets a reference to a particle by its handle
    pub fn get_particle(&self, handle: ParticleHandle) -> Result<&Particle> {
        self.particles.get_body(handle)
    }

    /// Gets a mutable reference to a particle by its handle
    pub fn get_particle_mut(&mut self, handle: ParticleHandle) -> Result<&mut Particle> {
        self.particles.get_body_mut(handle)
    }

    /// Returns the number of particles in the world
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Registers a force generator against a particle
    pub fn add_force_generator(
        &mut self,
        particle: ParticleHandle,
        generator: Box<dyn ParticleForceGenerator>,
    ) {
        self.registry.add(particle, generator);
    }

    /// Removes all force registrations targeting a particle; the particle
    /// itself is unaffected
    pub fn remove_force_generators_for_particle(&mut self, particle: ParticleHandle) {
        self.registry.remove_for_particle(particle);
    }

    /// Returns the force registry
    pub fn force_registry(&self) -> &ParticleForceRegistry {
        &self.registry
    }

    /// Returns the force registry mutably
    pub fn force_registry_mut(&mut self) -> &mut ParticleForceRegistry {
        &mut self.registry
    }

    /// Registers a contact generator
    pub fn add_contact_generator(&mut self, generator: Box<dyn ParticleContactGenerator>) {
        self.contact_generators.push(generator);
    }

    /// Removes a contact generator by index, returning it
    pub fn remove_contact_generator(
        &mut self,
        index: usize,
    ) -> Option<Box<dyn ParticleContactGenerator>> {
        if index < self.contact_generators.len() {
            Some(self.contact_generators.remove(index))
        } else {
            None
        }
    }

    /// Returns the contact resolver, for diagnostics
    pub fn resolver(&self) -> &ParticleContactResolver {
        &self.resolver
    }

    /// Initialises the world for a simulation frame by clearing every
    /// particle's force accumulator
    pub fn start_frame(&mut self) {
        for (_, particle) in self.particles.iter_mut() {
            particle.clear_accumulator();
        }
    }

    /// Calls each registered contact generator in turn to report its
    /// contacts, and returns the number generated. Once the buffer is full,
    /// remaining generators are skipped for the frame.
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
            let used = generator.add_contacts(&self.particles, &mut self.contacts, limit);
            debug_assert!(used <= limit);
            // A generator that ignores its limit must not grow the buffer.
            self.contacts.truncate(max_contacts);
        }

        self.contacts.len()
    }

    /// Processes all the physics for the world: applies registered force
    /// generators, integrates every particle, generates contacts, and
    /// resolves them.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is not positive.
    pub fn run_physics(&mut self, dt: f32) {
        assert!(dt > 0.0);

        self.registry.update_forces(&mut self.particles, dt);

        for (_, particle) in self.particles.iter_mut() {
            particle.integrate(dt);
        }

        let used_contacts = self.generate_contacts();

        if used_contacts > 0 {
            if self.calculate_iterations {
                self.resolver.set_iterations(used_contacts as u32 * 2);
            }
            self.resolver
                .resolve_contacts(&self.contacts, &mut self.particles, dt);
            debug!(
                "resolved {} contacts in {} iterations",
                used_contacts,
                self.resolver.get_iterations_used()
            );
        }
    }
}

impl Default for ParticleWorld {
    fn default() -> Self {
        Self::new()
    }
}
