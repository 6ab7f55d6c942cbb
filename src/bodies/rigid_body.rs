use crate::bodies::body_flags::BodyFlags;
use crate::core::DEFAULT_SLEEP_EPSILON;
use crate::math::{Matrix3, Matrix4, Quaternion, Vector3};

/// Asserts that no principal direction of the inverse inertia tensor is
/// degenerate. An all-zero row would make the body unable to respond to
/// torque around that axis while claiming finite mass.
fn check_inverse_inertia_tensor(tensor: &Matrix3) {
    for row in &tensor.data {
        assert!(
            row[0] != 0.0 || row[1] != 0.0 || row[2] != 0.0,
            "degenerate inverse inertia tensor"
        );
    }
}

/// A rigid body with full linear and angular state.
///
/// Direct state mutation (position, orientation) leaves the derived data
/// stale: the world transform and the world-space inverse inertia tensor.
/// Callers must invoke [`calculate_derived_data`](RigidBody::calculate_derived_data)
/// before any transform-dependent query. [`integrate`](RigidBody::integrate)
/// does so automatically.
#[derive(Debug, Clone)]
pub struct RigidBody {
    /// Position of the center of mass in world space
    position: Vector3,

    /// Orientation in world space
    orientation: Quaternion,

    /// Linear velocity in world space
    velocity: Vector3,

    /// Angular velocity in world space
    angular_velocity: Vector3,

    /// Constant acceleration (typically gravity) applied every frame
    acceleration: Vector3,

    /// Linear acceleration of the previous integration step, including the
    /// contribution of accumulated forces
    last_frame_acceleration: Vector3,

    /// Per-frame exponential decay base for linear velocity
    linear_damping: f32,

    /// Per-frame exponential decay base for angular velocity
    angular_damping: f32,

    /// Inverse of the body's mass; zero represents an immovable body
    inverse_mass: f32,

    /// Inverse inertia tensor in body space
    inverse_inertia_tensor: Matrix3,

    /// Derived: inverse inertia tensor in world space
    inverse_inertia_tensor_world: Matrix3,

    /// Derived: body-to-world transform
    transform: Matrix4,

    /// Accumulated force for the next integration step
    force_accum: Vector3,

    /// Accumulated torque for the next integration step
    torque_accum: Vector3,

    /// Awake and can-sleep state
    flags: BodyFlags,

    /// Exponentially smoothed estimate of recent kinetic plus rotational
    /// energy, used for the sleep decision
    motion: f32,

    /// Energy threshold below which this body falls asleep; pushed down from
    /// the owning world's configuration
    sleep_epsilon: f32,
}

impl RigidBody {
    /// Creates a new rigid body at the origin with unit mass and identity
    /// inertia tensor
    pub fn new() -> Self {
        Self {
            position: Vector3::zero(),
            orientation: Quaternion::identity(),
            velocity: Vector3::zero(),
            angular_velocity: Vector3::zero(),
            acceleration: Vector3::zero(),
            last_frame_acceleration: Vector3::zero(),
            linear_damping: 0.99,
            angular_damping: 0.99,
            inverse_mass: 1.0,
            inverse_inertia_tensor: Matrix3::identity(),
            inverse_inertia_tensor_world: Matrix3::identity(),
            transform: Matrix4::identity(),
            force_accum: Vector3::zero(),
            torque_accum: Vector3::zero(),
            flags: BodyFlags::AWAKE | BodyFlags::CAN_SLEEP,
            // Seeded as if freshly woken, so the smoothed estimate has to
            // decay before the body can fall asleep.
            motion: DEFAULT_SLEEP_EPSILON * 2.0,
            sleep_epsilon: DEFAULT_SLEEP_EPSILON,
        }
    }

    /// Normalizes the orientation and rebuilds the derived data: the
    /// body-to-world transform from (position, orientation), and the
    /// world-space inverse inertia tensor `R * I^-1 * R^T`.
    pub fn calculate_derived_data(&mut self) {
        self.orientation.normalize_mut();

        self.transform = Matrix4::from_orientation_and_pos(&self.orientation, self.position);

        let rotation = self.transform.to_matrix3();
        self.inverse_inertia_tensor_world = rotation
            .multiply_matrix(&self.inverse_inertia_tensor)
            .multiply_matrix(&rotation.transpose());
    }

    /// Integrates the body forward in time by the given amount. Sleeping
    /// bodies are not advanced.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is not positive.
    pub fn integrate(&mut self, dt: f32) {
        assert!(dt > 0.0);

        if !self.is_awake() {
            return;
        }

        // Linear acceleration from constant acceleration and force inputs.
        self.last_frame_acceleration = self.acceleration;
        self.last_frame_acceleration
            .add_scaled_vector(&self.force_accum, self.inverse_mass);

        // Angular acceleration from torque inputs, in body space.
        let angular_acceleration = self.inverse_inertia_tensor.transform(self.torque_accum);

        self.velocity.add_scaled_vector(&self.last_frame_acceleration, dt);
        self.angular_velocity.add_scaled_vector(&angular_acceleration, dt);

        // Impose drag.
        self.velocity *= self.linear_damping.powf(dt);
        self.angular_velocity *= self.angular_damping.powf(dt);

        self.position.add_scaled_vector(&self.velocity, dt);
        self.orientation.add_scaled_vector(&self.angular_velocity, dt);

        self.calculate_derived_data();
        self.clear_accumulators();

        // Update the motion estimate and possibly put the body to sleep.
        if self.can_sleep() {
            let current_motion = self.velocity.dot(&self.velocity)
                + self.angular_velocity.dot(&self.angular_velocity);

            let bias = 0.5_f32.powf(dt);
            self.motion = bias * self.motion + (1.0 - bias) * current_motion;

            if self.motion < self.sleep_epsilon {
                self.set_awake(false);
            } else if self.motion > 10.0 * self.sleep_epsilon {
                // Clamp the estimate so a burst of motion cannot delay
                // sleeping indefinitely.
                self.motion = 10.0 * self.sleep_epsilon;
            }
        }
    }

    /// Clears the force and torque accumulators
    pub fn clear_accumulators(&mut self) {
        self.force_accum.clear();
        self.torque_accum.clear();
    }

    /// Adds the given force to the accumulator, applied at the center of
    /// mass so it generates no torque
    pub fn add_force(&mut self, force: Vector3) {
        self.force_accum += force;
    }

    /// Adds the given torque to the accumulator
    pub fn add_torque(&mut self, torque: Vector3) {
        self.torque_accum += torque;
    }

    /// Adds the given force applied at a point in world space, accumulating
    /// both force and the torque it produces about the center of mass.
    /// Applying an off-center force implies active participation in the
    /// simulation, so this always wakes the body.
    pub fn add_force_at_point(&mut self, force: Vector3, point: Vector3) {
        let pt = point - self.position;

        self.force_accum += force;
        self.torque_accum += pt.cross(&force);

        self.flags.insert(BodyFlags::AWAKE);
    }

    /// Adds the given force applied at a point in body space
    pub fn add_force_at_body_point(&mut self, force: Vector3, point: Vector3) {
        let world_point = self.get_point_in_world_space(point);
        self.add_force_at_point(force, world_point);
    }

    /// Returns whether the body is awake
    pub fn is_awake(&self) -> bool {
        self.flags.contains(BodyFlags::AWAKE)
    }

    /// Wakes the body or puts it to sleep. Waking seeds the motion estimate
    /// above the sleep threshold so the body does not immediately re-sleep;
    /// sleeping zeroes both velocities so the body holds still.
    pub fn set_awake(&mut self, awake: bool) {
        if awake {
            self.flags.insert(BodyFlags::AWAKE);
            self.motion = self.sleep_epsilon * 2.0;
        } else {
            self.flags.remove(BodyFlags::AWAKE);
            self.velocity.clear();
            self.angular_velocity.clear();
        }
    }

    /// Returns whether the body may be put to sleep
    pub fn can_sleep(&self) -> bool {
        self.flags.contains(BodyFlags::CAN_SLEEP)
    }

    /// Sets whether the body may be put to sleep. A body that cannot sleep
    /// must be active, so revoking the permission wakes a sleeping body.
    pub fn set_can_sleep(&mut self, can_sleep: bool) {
        if can_sleep {
            self.flags.insert(BodyFlags::CAN_SLEEP);
        } else {
            self.flags.remove(BodyFlags::CAN_SLEEP);
            if !self.is_awake() {
                self.set_awake(true);
            }
        }
    }

    /// Returns the sleep-energy threshold this body uses
    pub fn get_sleep_epsilon(&self) -> f32 {
        self.sleep_epsilon
    }

    /// Sets the sleep-energy threshold this body uses
    pub fn set_sleep_epsilon(&mut self, sleep_epsilon: f32) {
        self.sleep_epsilon = sleep_epsilon;
    }

    /// Sets the mass of the body. Use [`set_inverse_mass`] with zero to
    /// represent an immovable body; a mass of exactly zero has no meaning.
    ///
    /// [`set_inverse_mass`]: RigidBody::set_inverse_mass
    ///
    /// # Panics
    ///
    /// Panics if `mass` is exactly zero.
    pub fn set_mass(&mut self, mass: f32) {
        assert!(mass != 0.0);
        self.inverse_mass = 1.0 / mass;
    }

    /// Sets the inverse mass of the body; zero makes it immovable
    pub fn set_inverse_mass(&mut self, inverse_mass: f32) {
        self.inverse_mass = inverse_mass;
    }

    /// Returns the mass of the body, or `f32::MAX` when the inverse mass is
    /// zero
    pub fn get_mass(&self) -> f32 {
        if self.inverse_mass == 0.0 {
            f32::MAX
        } else {
            1.0 / self.inverse_mass
        }
    }

    /// Returns the inverse mass of the body
    pub fn get_inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Returns true when the body has finite mass (inverse mass above zero)
    pub fn has_finite_mass(&self) -> bool {
        self.inverse_mass > 0.0
    }

    /// Sets the body-space inertia tensor, storing its inverse.
    ///
    /// # Panics
    ///
    /// Panics if the tensor is degenerate along any principal direction.
    pub fn set_inertia_tensor(&mut self, inertia_tensor: &Matrix3) {
        match inertia_tensor.inverse() {
            Some(inverse) => {
                check_inverse_inertia_tensor(&inverse);
                self.inverse_inertia_tensor = inverse;
            }
            None => panic!("inertia tensor is not invertible"),
        }
    }

    /// Sets the body-space inverse inertia tensor directly.
    ///
    /// # Panics
    ///
    /// Panics if the tensor is degenerate along any principal direction.
    pub fn set_inverse_inertia_tensor(&mut self, inverse_inertia_tensor: &Matrix3) {
        check_inverse_inertia_tensor(inverse_inertia_tensor);
        self.inverse_inertia_tensor = *inverse_inertia_tensor;
    }

    /// Returns the body-space inertia tensor, recovered from the stored
    /// inverse
    pub fn get_inertia_tensor(&self) -> Matrix3 {
        self.inverse_inertia_tensor
            .inverse()
            .unwrap_or(self.inverse_inertia_tensor)
    }

    /// Returns the body-space inverse inertia tensor
    pub fn get_inverse_inertia_tensor(&self) -> &Matrix3 {
        &self.inverse_inertia_tensor
    }

    /// Returns the world-space inverse inertia tensor derived at the last
    /// [`calculate_derived_data`](RigidBody::calculate_derived_data)
    pub fn get_inverse_inertia_tensor_world(&self) -> &Matrix3 {
        &self.inverse_inertia_tensor_world
    }

    /// Returns the position of the body
    pub fn get_position(&self) -> Vector3 {
        self.position
    }

    /// Sets the position of the body
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Returns the orientation of the body
    pub fn get_orientation(&self) -> Quaternion {
        self.orientation
    }

    /// Sets the orientation of the body
    pub fn set_orientation(&mut self, orientation: Quaternion) {
        self.orientation = orientation;
    }

    /// Returns the linear velocity of the body
    pub fn get_velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Sets the linear velocity of the body
    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    /// Adds the given delta to the linear velocity
    pub fn add_velocity(&mut self, delta_velocity: Vector3) {
        self.velocity += delta_velocity;
    }

    /// Returns the angular velocity of the body
    pub fn get_angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    /// Sets the angular velocity of the body
    pub fn set_angular_velocity(&mut self, angular_velocity: Vector3) {
        self.angular_velocity = angular_velocity;
    }

    /// Adds the given delta to the angular velocity
    pub fn add_angular_velocity(&mut self, delta_rotation: Vector3) {
        self.angular_velocity += delta_rotation;
    }

    /// Returns the constant acceleration of the body
    pub fn get_acceleration(&self) -> Vector3 {
        self.acceleration
    }

    /// Sets the constant acceleration of the body
    pub fn set_acceleration(&mut self, acceleration: Vector3) {
        self.acceleration = acceleration;
    }

    /// Returns the total linear acceleration of the previous integration
    /// step, including accumulated forces
    pub fn get_last_frame_acceleration(&self) -> Vector3 {
        self.last_frame_acceleration
    }

    /// Returns the linear damping coefficient
    pub fn get_linear_damping(&self) -> f32 {
        self.linear_damping
    }

    /// Sets the linear damping coefficient
    pub fn set_linear_damping(&mut self, linear_damping: f32) {
        self.linear_damping = linear_damping;
    }

    /// Returns the angular damping coefficient
    pub fn get_angular_damping(&self) -> f32 {
        self.angular_damping
    }

    /// Sets the angular damping coefficient
    pub fn set_angular_damping(&mut self, angular_damping: f32) {
        self.angular_damping = angular_damping;
    }

    /// Returns the body-to-world transform derived at the last
    /// [`calculate_derived_data`](RigidBody::calculate_derived_data)
    pub fn get_transform(&self) -> &Matrix4 {
        &self.transform
    }

    /// Converts a point from body space to world space
    pub fn get_point_in_world_space(&self, point: Vector3) -> Vector3 {
        self.transform.transform(point)
    }

    /// Converts a point from world space to body space
    pub fn get_point_in_local_space(&self, point: Vector3) -> Vector3 {
        self.transform.transform_inverse(point)
    }

    /// Converts a direction from body space to world space
    pub fn get_direction_in_world_space(&self, direction: Vector3) -> Vector3 {
        self.transform.transform_direction(direction)
    }

    /// Converts a direction from world space to body space
    pub fn get_direction_in_local_space(&self, direction: Vector3) -> Vector3 {
        self.transform.transform_inverse_direction(direction)
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}
