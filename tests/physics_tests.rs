use approx::assert_relative_eq;
use impulse_physics::forces::{
    ParticleAnchoredSpring, ParticleBungee, ParticleDrag, ParticleGravity, ParticleSpring,
};
use impulse_physics::math::{Matrix3, Quaternion, Vector3};
use impulse_physics::{Particle, ParticleWorld, RigidBody, SimulationConfig, World};
use std::f32::consts::PI;

// === Particle model ===

#[test]
fn test_particle_integration() {
    let mut particle = Particle::new();
    particle.set_mass(2.0);
    particle.set_velocity(Vector3::new(1.0, 0.0, 0.0));
    particle.add_force(Vector3::new(2.0, 0.0, 0.0));

    particle.integrate(1.0);

    // Position advances by the old velocity, then velocity picks up the
    // force-driven acceleration.
    assert_relative_eq!(particle.get_position().x, 1.0);
    assert_relative_eq!(particle.get_velocity().x, 2.0);

    // The accumulator was cleared, so a second step coasts.
    particle.integrate(1.0);
    assert_relative_eq!(particle.get_position().x, 3.0);
    assert_relative_eq!(particle.get_velocity().x, 2.0);
}

#[test]
fn test_particle_constant_acceleration_term() {
    let mut particle = Particle::new();
    particle.set_acceleration(Vector3::new(0.0, -10.0, 0.0));

    particle.integrate(1.0);

    // s = u*t + a*t^2/2 with u = 0.
    assert_relative_eq!(particle.get_position().y, -5.0);
    assert_relative_eq!(particle.get_velocity().y, -10.0);
}

#[test]
fn test_particle_damping_is_not_applied_during_integration() {
    let mut particle = Particle::new();
    particle.set_damping(0.5);
    particle.set_velocity(Vector3::new(1.0, 0.0, 0.0));

    particle.integrate(1.0);

    // Damping is stored and exposed but does not decay the velocity.
    assert_relative_eq!(particle.get_damping(), 0.5);
    assert_relative_eq!(particle.get_velocity().x, 1.0);
}

#[test]
#[should_panic]
fn test_particle_integrate_rejects_zero_dt() {
    let mut particle = Particle::new();
    particle.integrate(0.0);
}

#[test]
#[should_panic]
fn test_particle_set_mass_rejects_zero() {
    let mut particle = Particle::new();
    particle.set_mass(0.0);
}

#[test]
fn test_particle_infinite_mass_sentinel() {
    let mut particle = Particle::new();
    particle.set_inverse_mass(0.0);
    assert_eq!(particle.get_mass(), f32::MAX);

    particle.set_mass(4.0);
    assert_relative_eq!(particle.get_inverse_mass(), 0.25);
    assert_relative_eq!(particle.get_mass(), 4.0);
}

#[test]
fn test_has_finite_mass_polarities_differ() {
    // The particle accessor answers true for an immovable particle; the
    // rigid body accessor answers true for a movable body. Both behaviors
    // are relied upon by callers.
    let mut particle = Particle::new();
    particle.set_inverse_mass(0.0);
    assert!(particle.has_finite_mass());
    particle.set_mass(1.0);
    assert!(!particle.has_finite_mass());

    let mut body = RigidBody::new();
    body.set_inverse_mass(0.0);
    assert!(!body.has_finite_mass());
    body.set_mass(1.0);
    assert!(body.has_finite_mass());
}

// === Particle forces ===

#[test]
fn test_particle_gravity() {
    let mut world = ParticleWorld::new();

    let mut particle = Particle::new();
    particle.set_mass(2.0);
    let handle = world.add_particle(particle);

    world.add_force_generator(
        handle,
        Box::new(ParticleGravity::new(Vector3::new(0.0, -10.0, 0.0))),
    );

    world.start_frame();
    world.run_physics(0.1);

    // f = m*g, a = f/m, v = a*dt.
    let velocity = world.get_particle(handle).unwrap().get_velocity();
    assert_relative_eq!(velocity.y, -1.0, epsilon = 1e-5);
}

#[test]
fn test_particle_gravity_skips_immovable_targets() {
    let mut world = ParticleWorld::new();

    let mut particle = Particle::new();
    particle.set_inverse_mass(0.0);
    let handle = world.add_particle(particle);

    world.add_force_generator(
        handle,
        Box::new(ParticleGravity::new(Vector3::new(0.0, -10.0, 0.0))),
    );

    world.start_frame();
    world.run_physics(0.1);

    assert_eq!(world.get_particle(handle).unwrap().get_velocity(), Vector3::zero());
}

#[test]
fn test_particle_drag() {
    let mut world = ParticleWorld::new();

    let mut particle = Particle::new();
    particle.set_velocity(Vector3::new(1.0, 0.0, 0.0));
    let handle = world.add_particle(particle);

    world.add_force_generator(handle, Box::new(ParticleDrag::new(1.0, 0.0)));

    world.start_frame();
    world.run_physics(0.1);

    // Linear drag at |v| = 1 gives a unit decelerating force.
    let velocity = world.get_particle(handle).unwrap().get_velocity();
    assert_relative_eq!(velocity.x, 0.9, epsilon = 1e-5);
}

#[test]
fn test_particle_spring_pulls_towards_other() {
    let mut world = ParticleWorld::new();

    let mut particle = Particle::new();
    particle.set_position(Vector3::new(3.0, 0.0, 0.0));
    let moving = world.add_particle(particle);

    let mut anchor_particle = Particle::new();
    anchor_particle.set_inverse_mass(0.0);
    let anchor = world.add_particle(anchor_particle);

    // Extension of 2 at stiffness 10 pulls with magnitude 20.
    world.add_force_generator(moving, Box::new(ParticleSpring::new(anchor, 10.0, 1.0)));

    world.start_frame();
    world.run_physics(0.01);

    let velocity = world.get_particle(moving).unwrap().get_velocity();
    assert_relative_eq!(velocity.x, -0.2, epsilon = 1e-4);
}

#[test]
fn test_anchored_spring() {
    let mut world = ParticleWorld::new();

    let mut particle = Particle::new();
    particle.set_position(Vector3::new(0.0, -2.0, 0.0));
    let handle = world.add_particle(particle);

    world.add_force_generator(
        handle,
        Box::new(ParticleAnchoredSpring::new(Vector3::zero(), 5.0, 1.0)),
    );

    world.start_frame();
    world.run_physics(0.01);

    // Stretched one unit past rest; the pull is back towards the anchor.
    let velocity = world.get_particle(handle).unwrap().get_velocity();
    assert_relative_eq!(velocity.y, 0.05, epsilon = 1e-4);
}

#[test]
fn test_bungee_applies_no_force_while_slack() {
    let mut world = ParticleWorld::new();

    let mut particle = Particle::new();
    particle.set_position(Vector3::new(0.5, 0.0, 0.0));
    let moving = world.add_particle(particle);

    let mut other = Particle::new();
    other.set_inverse_mass(0.0);
    let anchor = world.add_particle(other);

    world.add_force_generator(moving, Box::new(ParticleBungee::new(anchor, 10.0, 1.0)));

    world.start_frame();
    world.run_physics(0.01);

    assert_eq!(world.get_particle(moving).unwrap().get_velocity(), Vector3::zero());
}

// === Rigid body model ===

#[test]
fn test_rigid_body_linear_integration() {
    let mut body = RigidBody::new();
    body.set_linear_damping(1.0);
    body.set_angular_damping(1.0);
    body.set_acceleration(Vector3::new(0.0, -10.0, 0.0));
    body.set_can_sleep(false);
    body.calculate_derived_data();

    body.integrate(1.0);

    assert_relative_eq!(body.get_velocity().y, -10.0);
    assert_relative_eq!(body.get_position().y, -10.0);
    assert_relative_eq!(body.get_last_frame_acceleration().y, -10.0);
}

#[test]
fn test_rigid_body_damping_decays_velocity() {
    let mut body = RigidBody::new();
    body.set_linear_damping(0.5);
    body.set_can_sleep(false);
    body.set_velocity(Vector3::new(8.0, 0.0, 0.0));
    body.calculate_derived_data();

    // Two half-second steps decay by 0.5^0.5 twice, one full power of the
    // damping base per simulated second.
    body.integrate(0.5);
    body.integrate(0.5);

    assert_relative_eq!(body.get_velocity().x, 4.0, epsilon = 1e-4);
}

#[test]
fn test_add_force_at_point_generates_torque_and_wakes() {
    let mut body = RigidBody::new();
    body.set_can_sleep(true);
    body.set_awake(false);
    body.calculate_derived_data();
    assert!(!body.is_awake());

    // An off-center force spins the body about +z.
    body.add_force_at_point(Vector3::new(0.0, 1.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    assert!(body.is_awake());

    body.integrate(0.1);
    assert!(body.get_angular_velocity().z > 0.0);
}

#[test]
fn test_orientation_integration() {
    let mut body = RigidBody::new();
    body.set_can_sleep(false);
    body.set_angular_damping(1.0);
    body.set_angular_velocity(Vector3::new(0.0, PI, 0.0));
    body.calculate_derived_data();

    // Many small steps of the first-order orientation update stay close to
    // the exact quarter turn.
    for _ in 0..50 {
        body.integrate(0.01);
    }

    let expected = Quaternion::from_axis_angle(Vector3::unit_y(), PI / 2.0);
    let actual = body.get_orientation();
    assert_relative_eq!(actual.w.abs(), expected.w.abs(), epsilon = 1e-2);
    assert_relative_eq!(actual.y.abs(), expected.y.abs(), epsilon = 1e-2);
}

#[test]
fn test_derived_data_follows_state() {
    let mut body = RigidBody::new();
    body.set_position(Vector3::new(1.0, 2.0, 3.0));
    body.set_orientation(Quaternion::from_axis_angle(Vector3::unit_y(), PI / 2.0));
    body.calculate_derived_data();

    assert_eq!(body.get_transform().translation(), Vector3::new(1.0, 2.0, 3.0));

    // +x in body space points to -z in world space after the quarter turn.
    let world_point = body.get_point_in_world_space(Vector3::unit_x());
    assert_relative_eq!(world_point.x, 1.0, epsilon = 1e-5);
    assert_relative_eq!(world_point.y, 2.0, epsilon = 1e-5);
    assert_relative_eq!(world_point.z, 2.0, epsilon = 1e-5);

    let back = body.get_point_in_local_space(world_point);
    assert_relative_eq!(back.x, 1.0, epsilon = 1e-5);
    assert_relative_eq!(back.y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(back.z, 0.0, epsilon = 1e-5);
}

#[test]
fn test_world_inertia_tensor_tracks_orientation() {
    let mut body = RigidBody::new();
    body.set_inertia_tensor(&Matrix3::from_diagonal(Vector3::new(1.0, 2.0, 4.0)));
    body.set_orientation(Quaternion::from_axis_angle(Vector3::unit_y(), PI / 2.0));
    body.calculate_derived_data();

    // After a quarter turn about y, the x and z principal axes swap.
    let world_tensor = body.get_inverse_inertia_tensor_world();
    assert_relative_eq!(world_tensor.data[0][0], 0.25, epsilon = 1e-4);
    assert_relative_eq!(world_tensor.data[1][1], 0.5, epsilon = 1e-4);
    assert_relative_eq!(world_tensor.data[2][2], 1.0, epsilon = 1e-4);
}

#[test]
#[should_panic]
fn test_degenerate_inertia_tensor_is_rejected() {
    let mut body = RigidBody::new();
    body.set_inertia_tensor(&Matrix3::zero());
}

#[test]
#[should_panic]
fn test_rigid_body_integrate_rejects_negative_dt() {
    let mut body = RigidBody::new();
    body.integrate(-0.01);
}

#[test]
fn test_set_awake_false_zeroes_velocities() {
    let mut body = RigidBody::new();
    body.set_velocity(Vector3::new(1.0, 2.0, 3.0));
    body.set_angular_velocity(Vector3::new(0.1, 0.2, 0.3));

    body.set_awake(false);

    assert!(!body.is_awake());
    assert_eq!(body.get_velocity(), Vector3::zero());
    assert_eq!(body.get_angular_velocity(), Vector3::zero());
}

#[test]
fn test_revoking_can_sleep_wakes_the_body() {
    let mut body = RigidBody::new();
    body.set_awake(false);
    assert!(!body.is_awake());

    body.set_can_sleep(false);
    assert!(body.is_awake());
}

#[test]
fn test_body_falls_asleep_and_stays_put() {
    let mut world = World::new();

    let mut body = RigidBody::new();
    body.set_velocity(Vector3::new(0.01, 0.0, 0.0));
    body.set_linear_damping(1.0);
    body.set_angular_damping(1.0);
    let handle = world.add_body(body);

    // With negligible motion the smoothed energy estimate decays below the
    // sleep threshold within a couple of simulated seconds.
    for _ in 0..100 {
        world.start_frame();
        world.run_physics(0.05);
    }
    assert!(!world.get_body(handle).unwrap().is_awake());

    let position = world.get_body(handle).unwrap().get_position();
    world.start_frame();
    world.run_physics(0.05);
    assert_eq!(world.get_body(handle).unwrap().get_position(), position);
}

#[test]
fn test_sleep_epsilon_is_pushed_to_bodies() {
    let mut world = World::new();
    let handle = world.add_body(RigidBody::new());

    world.set_sleep_epsilon(1.25);

    assert_relative_eq!(world.get_sleep_epsilon(), 1.25);
    assert_relative_eq!(world.get_body(handle).unwrap().get_sleep_epsilon(), 1.25);

    let config = SimulationConfig {
        sleep_epsilon: 0.05,
        ..SimulationConfig::default()
    };
    let mut quiet_world = World::with_config(config);
    let other = quiet_world.add_body(RigidBody::new());
    assert_relative_eq!(
        quiet_world.get_body(other).unwrap().get_sleep_epsilon(),
        0.05
    );
}

#[test]
fn test_start_frame_discards_stale_forces() {
    let mut world = World::new();
    let mut body = RigidBody::new();
    body.set_can_sleep(false);
    body.set_linear_damping(1.0);
    let handle = world.add_body(body);

    // A force added before start_frame belongs to no frame and is cleared.
    world
        .get_body_mut(handle)
        .unwrap()
        .add_force(Vector3::new(100.0, 0.0, 0.0));

    world.start_frame();
    world.run_physics(0.1);

    assert_eq!(world.get_body(handle).unwrap().get_velocity(), Vector3::zero());
}
