use approx::assert_relative_eq;
use impulse_physics::collision::{
    BoundingSphere, Contact, ContactGenerator, ContactResolver, CubeContactGenerator,
    GroundContactGenerator, ParticleCubeContactGenerator,
};
use impulse_physics::core::BodyStorage;
use impulse_physics::math::Vector3;
use impulse_physics::{Particle, ParticleWorld, RigidBody, SimulationConfig, World};

fn movable_body(position: Vector3, velocity: Vector3) -> RigidBody {
    let mut body = RigidBody::new();
    body.set_position(position);
    body.set_velocity(velocity);
    body.set_can_sleep(false);
    body.set_linear_damping(1.0);
    body.set_angular_damping(1.0);
    body.calculate_derived_data();
    body
}

// === Contact resolution ===

#[test]
fn test_resolution_obeys_restitution_and_conserves_momentum() {
    let mut bodies = BodyStorage::new();
    let a = bodies.add(movable_body(Vector3::zero(), Vector3::new(1.0, 0.0, 0.0)));
    let b = bodies.add(movable_body(
        Vector3::new(0.9, 0.0, 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
    ));

    let restitution = 0.5;
    let normal = Vector3::new(-1.0, 0.0, 0.0);
    let contact = Contact::new(a, Some(b), normal, 0.0, restitution);

    let closing_speed = -contact.separating_velocity(&bodies);
    assert_relative_eq!(closing_speed, 2.0);

    let mut resolver = ContactResolver::new(4);
    resolver.resolve_contacts(
        std::slice::from_ref(&contact),
        &mut bodies,
        0.01,
    );

    // The rebound carries restitution times the closing speed.
    let post_separating = contact.separating_velocity(&bodies);
    assert_relative_eq!(post_separating, restitution * closing_speed, epsilon = 1e-4);

    // Equal masses, so momentum along the normal still sums to zero.
    let va = bodies.get(a).unwrap().get_velocity();
    let vb = bodies.get(b).unwrap().get_velocity();
    assert_relative_eq!(va.x + vb.x, 0.0, epsilon = 1e-4);
    assert_relative_eq!(va.x, -0.5, epsilon = 1e-4);
    assert_relative_eq!(vb.x, 0.5, epsilon = 1e-4);
}

#[test]
fn test_interpenetration_moves_only_the_movable_participant() {
    let mut bodies = BodyStorage::new();
    let a = bodies.add(movable_body(Vector3::zero(), Vector3::zero()));

    let penetration = 0.5;
    let contact = Contact::new(a, None, Vector3::unit_y(), penetration, 0.0);

    let mut resolver = ContactResolver::new(1);
    resolver.resolve_contacts(std::slice::from_ref(&contact), &mut bodies, 0.01);

    // The single movable body absorbs the whole correction.
    let body = bodies.get(a).unwrap();
    assert_relative_eq!(body.get_position().y.abs(), penetration, epsilon = 1e-5);
    assert_eq!(body.get_velocity(), Vector3::zero());
}

#[test]
fn test_zero_iteration_budget_changes_nothing() {
    let mut bodies = BodyStorage::new();
    let a = bodies.add(movable_body(Vector3::zero(), Vector3::new(1.0, 0.0, 0.0)));
    let b = bodies.add(movable_body(
        Vector3::new(0.5, 0.0, 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
    ));

    let contact = Contact::new(a, Some(b), Vector3::new(-1.0, 0.0, 0.0), 0.3, 1.0);

    let mut resolver = ContactResolver::new(0);
    resolver.resolve_contacts(std::slice::from_ref(&contact), &mut bodies, 0.01);

    assert_eq!(resolver.get_iterations_used(), 0);
    assert_eq!(bodies.get(a).unwrap().get_velocity(), Vector3::new(1.0, 0.0, 0.0));
    assert_eq!(bodies.get(b).unwrap().get_velocity(), Vector3::new(-1.0, 0.0, 0.0));
    assert_eq!(bodies.get(a).unwrap().get_position(), Vector3::zero());
    assert_eq!(bodies.get(b).unwrap().get_position(), Vector3::new(0.5, 0.0, 0.0));
}

#[test]
fn test_both_immovable_is_skipped() {
    let mut bodies = BodyStorage::new();
    let mut heavy = movable_body(Vector3::zero(), Vector3::new(1.0, 0.0, 0.0));
    heavy.set_inverse_mass(0.0);
    let a = bodies.add(heavy);

    let contact = Contact::new(a, None, Vector3::new(-1.0, 0.0, 0.0), 0.2, 1.0);

    let mut resolver = ContactResolver::new(4);
    resolver.resolve_contacts(std::slice::from_ref(&contact), &mut bodies, 0.01);

    // Combined inverse mass is zero; neither pass has any effect.
    assert_eq!(bodies.get(a).unwrap().get_velocity(), Vector3::new(1.0, 0.0, 0.0));
    assert_eq!(bodies.get(a).unwrap().get_position(), Vector3::zero());
}

// === Contact generators ===

#[test]
fn test_cube_pair_generator_reports_minimum_axis() {
    let mut bodies = BodyStorage::new();
    let a = bodies.add(movable_body(Vector3::zero(), Vector3::zero()));
    let b = bodies.add(movable_body(Vector3::new(0.9, 0.0, 0.0), Vector3::zero()));

    let generator = CubeContactGenerator::new(a, b, 1.0);
    let mut contacts = Vec::new();
    let written = generator.add_contacts(&bodies, &mut contacts, 8);

    assert_eq!(written, 1);
    assert_eq!(contacts.len(), 1);

    let contact = &contacts[0];
    assert_relative_eq!(contact.normal.x.abs(), 1.0);
    assert_relative_eq!(contact.normal.y, 0.0);
    assert_relative_eq!(contact.normal.z, 0.0);
    // 0.1 of overlap, less the resting slop.
    assert_relative_eq!(contact.penetration, 0.09, epsilon = 1e-5);
}

#[test]
fn test_cube_pair_generator_reports_nothing_when_separated() {
    let mut bodies = BodyStorage::new();
    let a = bodies.add(movable_body(Vector3::zero(), Vector3::zero()));
    let b = bodies.add(movable_body(Vector3::new(2.0, 0.0, 0.0), Vector3::zero()));

    let generator = CubeContactGenerator::new(a, b, 1.0);
    let mut contacts = Vec::new();

    assert_eq!(generator.add_contacts(&bodies, &mut contacts, 8), 0);
    assert!(contacts.is_empty());
}

#[test]
fn test_cube_pair_generator_respects_limit() {
    let mut bodies = BodyStorage::new();
    let a = bodies.add(movable_body(Vector3::zero(), Vector3::zero()));
    let b = bodies.add(movable_body(Vector3::new(0.5, 0.0, 0.0), Vector3::zero()));

    let generator = CubeContactGenerator::new(a, b, 1.0);
    let mut contacts = Vec::new();

    assert_eq!(generator.add_contacts(&bodies, &mut contacts, 0), 0);
    assert!(contacts.is_empty());
}

// === Bounding spheres ===

#[test]
fn test_bounding_sphere_overlap() {
    let one = BoundingSphere::new(Vector3::zero(), 1.0);
    let two = BoundingSphere::new(Vector3::new(1.5, 0.0, 0.0), 1.0);
    let far = BoundingSphere::new(Vector3::new(3.0, 0.0, 0.0), 0.5);

    assert!(one.overlaps(&two));
    assert!(!one.overlaps(&far));
}

#[test]
fn test_enclosing_sphere_of_disjoint_spheres() {
    let one = BoundingSphere::new(Vector3::zero(), 1.0);
    let two = BoundingSphere::new(Vector3::new(4.0, 0.0, 0.0), 1.0);

    let enclosing = BoundingSphere::enclosing(&one, &two);
    assert_relative_eq!(enclosing.radius, 3.0);
    assert_relative_eq!(enclosing.centre.x, 2.0);
    assert_relative_eq!(enclosing.centre.y, 0.0);
}

#[test]
fn test_enclosing_sphere_when_one_contains_the_other() {
    let big = BoundingSphere::new(Vector3::zero(), 5.0);
    let small = BoundingSphere::new(Vector3::new(1.0, 0.0, 0.0), 1.0);

    let enclosing = BoundingSphere::enclosing(&big, &small);
    assert_eq!(enclosing, big);

    // Argument order does not matter for containment.
    let enclosing = BoundingSphere::enclosing(&small, &big);
    assert_eq!(enclosing, big);
}

#[test]
fn test_sphere_growth_metric() {
    let one = BoundingSphere::new(Vector3::zero(), 1.0);
    assert_relative_eq!(one.growth(&one), 0.0);

    let two = BoundingSphere::new(Vector3::new(4.0, 0.0, 0.0), 1.0);
    // Enclosing radius is 3, so the squared-radius delta is 9 - 1.
    assert_relative_eq!(one.growth(&two), 8.0);
}

// === World orchestration ===

#[test]
fn test_world_contact_buffer_never_overflows() {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = SimulationConfig {
        max_contacts: 2,
        ..SimulationConfig::default()
    };
    let mut world = World::with_config(config);

    // Three generators each want to write one contact; only two fit.
    for _ in 0..3 {
        let mut body = RigidBody::new();
        body.set_position(Vector3::new(0.0, -1.0, 0.0));
        body.set_can_sleep(false);
        body.calculate_derived_data();
        let handle = world.add_body(body);
        world.add_contact_generator(Box::new(GroundContactGenerator::new(handle, 0.0)));
    }

    assert_eq!(world.generate_contacts(), 2);
}

#[test]
fn test_world_ground_bounce() {
    let mut world = World::new();

    let mut body = movable_body(Vector3::new(0.0, -0.2, 0.0), Vector3::new(0.0, -1.0, 0.0));
    body.set_can_sleep(false);
    let handle = world.add_body(body);

    world.add_contact_generator(Box::new(
        GroundContactGenerator::new(handle, 0.0).with_restitution(0.5),
    ));

    world.start_frame();
    world.run_physics(0.01);

    // Closing at one unit per second, leaving at half that.
    let velocity = world.get_body(handle).unwrap().get_velocity();
    assert_relative_eq!(velocity.y, 0.5, epsilon = 1e-4);
}

#[test]
fn test_removed_body_is_returned_intact() {
    let mut world = World::new();

    let mut body = RigidBody::new();
    body.set_position(Vector3::new(1.0, 2.0, 3.0));
    let handle = world.add_body(body);
    assert_eq!(world.body_count(), 1);

    let removed = world.remove_body(handle).unwrap();
    assert_eq!(removed.get_position(), Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(world.body_count(), 0);
    assert!(world.get_body(handle).is_err());
}

#[test]
fn test_particle_world_collision_swaps_equal_mass_velocities() {
    let mut world = ParticleWorld::new();

    let mut pa = Particle::new();
    pa.set_position(Vector3::zero());
    pa.set_velocity(Vector3::new(1.0, 0.0, 0.0));
    let a = world.add_particle(pa);

    let mut pb = Particle::new();
    pb.set_position(Vector3::new(0.9, 0.0, 0.0));
    pb.set_velocity(Vector3::new(-1.0, 0.0, 0.0));
    let b = world.add_particle(pb);

    // Unit cubes with full restitution behave like an elastic collision.
    world.add_contact_generator(Box::new(ParticleCubeContactGenerator::new(a, b, 1.0)));

    world.start_frame();
    world.run_physics(0.01);

    let va = world.get_particle(a).unwrap().get_velocity();
    let vb = world.get_particle(b).unwrap().get_velocity();
    assert_relative_eq!(va.x, -1.0, epsilon = 1e-4);
    assert_relative_eq!(vb.x, 1.0, epsilon = 1e-4);
}

#[test]
fn test_particle_world_registration_roundtrip() {
    let mut world = ParticleWorld::new();

    let mut particle = Particle::new();
    particle.set_position(Vector3::new(5.0, 0.0, 0.0));
    let handle = world.add_particle(particle);
    assert_eq!(world.particle_count(), 1);

    let removed = world.remove_particle(handle).unwrap();
    assert_eq!(removed.get_position(), Vector3::new(5.0, 0.0, 0.0));
    assert_eq!(world.particle_count(), 0);
}
