use criterion::{black_box, criterion_group, criterion_main, Criterion};
use impulse_physics::collision::{CubeContactGenerator, GroundContactGenerator};
use impulse_physics::forces::Gravity;
use impulse_physics::math::Vector3;
use impulse_physics::{RigidBody, World};

/// Builds a world with a column of cubes falling onto the ground plane, so a
/// frame exercises force generation, integration, contact generation, and
/// resolution together.
fn build_world(body_count: usize) -> World {
    let mut world = World::new();
    let mut handles = Vec::with_capacity(body_count);

    for i in 0..body_count {
        let mut body = RigidBody::new();
        body.set_position(Vector3::new(0.0, 0.6 * i as f32 + 0.5, 0.0));
        body.set_can_sleep(false);
        body.calculate_derived_data();
        let handle = world.add_body(body);
        world.add_force_generator(handle, Box::new(Gravity::earth()));
        world.add_contact_generator(Box::new(GroundContactGenerator::new(handle, 0.0)));
        handles.push(handle);
    }

    for pair in handles.windows(2) {
        world.add_contact_generator(Box::new(CubeContactGenerator::new(pair[0], pair[1], 1.0)));
    }

    world
}

fn bench_world_step(c: &mut Criterion) {
    let mut world = build_world(32);

    c.bench_function("world_step_32_bodies", |b| {
        b.iter(|| {
            world.start_frame();
            world.run_physics(black_box(1.0 / 60.0));
        })
    });
}

fn bench_contact_generation(c: &mut Criterion) {
    let mut world = build_world(64);
    world.start_frame();

    c.bench_function("generate_contacts_64_bodies", |b| {
        b.iter(|| black_box(world.generate_contacts()))
    });
}

criterion_group!(benches, bench_world_step, bench_contact_generation);
criterion_main!(benches);
