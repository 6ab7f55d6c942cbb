use crate::math::Vector3;

/// A point mass: the simplest object that can be simulated. Carries linear
/// state only; orientation never changes.
///
/// The `scale` and `rotation` fields are carried for renderers that draw the
/// particle as a solid; the simulation itself never reads them.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Position in world space
    position: Vector3,

    /// Linear velocity in world space
    velocity: Vector3,

    /// Constant acceleration (typically gravity) applied every frame
    acceleration: Vector3,

    /// Damping coefficient for linear motion. Stored and exposed through the
    /// accessors, but not applied inside `integrate`; see the note there.
    damping: f32,

    /// Inverse of the particle's mass; zero represents infinite mass
    inverse_mass: f32,

    /// Accumulated force to be applied at the next integration step
    force_accum: Vector3,

    /// Render-only scale of the particle's visual
    scale: Vector3,

    /// Render-only orientation of the particle's visual
    rotation: Vector3,
}

impl Particle {
    /// Creates a new particle at the origin with unit mass
    pub fn new() -> Self {
        Self {
            position: Vector3::zero(),
            velocity: Vector3::zero(),
            acceleration: Vector3::zero(),
            damping: 0.99,
            inverse_mass: 1.0,
            force_accum: Vector3::zero(),
            scale: Vector3::one(),
            rotation: Vector3::zero(),
        }
    }

    /// Adds the given force to the accumulator, to be applied at the next
    /// integration step. May be called any number of times per frame.
    pub fn add_force(&mut self, force: Vector3) {
        self.force_accum += force;
    }

    /// Integrates the particle forward in time by the given amount using
    /// Newton-Euler integration: `s = u*t + a*t^2/2` for position, then the
    /// velocity update from the resulting acceleration.
    ///
    /// The stored damping coefficient is deliberately not applied here:
    /// unlike [`RigidBody::integrate`](crate::RigidBody::integrate), particle
    /// velocities carry over undecayed. The two contracts are documented
    /// separately rather than unified.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is not positive.
    pub fn integrate(&mut self, dt: f32) {
        assert!(dt > 0.0);

        self.position.add_scaled_vector(&self.velocity, dt);
        self.position.add_scaled_vector(&self.acceleration, dt * dt * 0.5);

        let mut resulting_acc = self.acceleration;
        resulting_acc.add_scaled_vector(&self.force_accum, self.inverse_mass);
        self.velocity.add_scaled_vector(&resulting_acc, dt);

        self.clear_accumulator();
    }

    /// Clears the force accumulator
    pub fn clear_accumulator(&mut self) {
        self.force_accum.clear();
    }

    /// Sets the mass of the particle. Use [`set_inverse_mass`] with zero to
    /// represent an immovable particle; a mass of exactly zero has no
    /// meaning.
    ///
    /// [`set_inverse_mass`]: Particle::set_inverse_mass
    ///
    /// # Panics
    ///
    /// Panics if `mass` is exactly zero.
    pub fn set_mass(&mut self, mass: f32) {
        assert!(mass != 0.0);
        self.inverse_mass = 1.0 / mass;
    }

    /// Sets the inverse mass of the particle; zero makes it immovable
    pub fn set_inverse_mass(&mut self, inverse_mass: f32) {
        self.inverse_mass = inverse_mass;
    }

    /// Returns the mass of the particle, or `f32::MAX` when the inverse mass
    /// is zero
    pub fn get_mass(&self) -> f32 {
        if self.inverse_mass == 0.0 {
            f32::MAX
        } else {
            1.0 / self.inverse_mass
        }
    }

    /// Returns the inverse mass of the particle
    pub fn get_inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Returns true when the inverse mass is exactly zero.
    ///
    /// Note: this polarity is the opposite of
    /// [`RigidBody::has_finite_mass`](crate::RigidBody::has_finite_mass) and
    /// looks inverted. Existing callers depend on the current behavior, so it
    /// is kept as-is; force generators test the inverse mass directly.
    pub fn has_finite_mass(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Returns the position of the particle
    pub fn get_position(&self) -> Vector3 {
        self.position
    }

    /// Sets the position of the particle
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Returns the velocity of the particle
    pub fn get_velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Sets the velocity of the particle
    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    /// Returns the constant acceleration of the particle
    pub fn get_acceleration(&self) -> Vector3 {
        self.acceleration
    }

    /// Sets the constant acceleration of the particle
    pub fn set_acceleration(&mut self, acceleration: Vector3) {
        self.acceleration = acceleration;
    }

    /// Returns the damping coefficient
    pub fn get_damping(&self) -> f32 {
        self.damping
    }

    /// Sets the damping coefficient
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping;
    }

    /// Returns the render scale of the particle
    pub fn get_scale(&self) -> Vector3 {
        self.scale
    }

    /// Sets the render scale of the particle
    pub fn set_scale(&mut self, scale: Vector3) {
        self.scale = scale;
    }

    /// Returns the render rotation of the particle
    pub fn get_rotation(&self) -> Vector3 {
        self.rotation
    }

    /// Sets the render rotation of the particle
    pub fn set_rotation(&mut self, rotation: Vector3) {
        self.rotation = rotation;
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::new()
    }
}
