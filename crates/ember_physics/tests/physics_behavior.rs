//! # Physics Behavior Tests
//!
//! Pins the observable contracts of integration, sleep/wake, collision
//! resolution, and boundary containment.

use ember_core::{Transform, Vec3, World};
use ember_physics::{collide_circles, CircleCollider, PhysicsConfig, PhysicsWorld, VerletBody};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DT: f32 = 1.0 / 60.0;

fn setup(config: &PhysicsConfig) -> (World, PhysicsWorld) {
    let mut world = World::new();
    let transform = world.register_component::<Transform>().unwrap();
    let physics = PhysicsWorld::new(&mut world, transform, config).unwrap();
    (world, physics)
}

fn weightless() -> PhysicsConfig {
    PhysicsConfig {
        gravity: [0.0, 0.0, 0.0],
        ..PhysicsConfig::default()
    }
}

fn position(world: &World, physics: &PhysicsWorld, entity: ember_core::EntityId) -> Vec3 {
    world
        .get_component::<Transform>(entity, physics.transform_type())
        .unwrap()
        .position
}

fn body(world: &World, physics: &PhysicsWorld, entity: ember_core::EntityId) -> VerletBody {
    *world
        .get_component::<VerletBody>(entity, physics.verlet_type())
        .unwrap()
}

#[test]
fn test_circles_start_awake_with_full_trio() {
    let (mut world, mut physics) = setup(&PhysicsConfig::default());
    let ball = physics.create_circle(&mut world, Vec3::new(1.0, 2.0, 0.0), 3.0, 1.5);

    assert!(!ball.is_null());
    assert!(world.has_component(ball, physics.transform_type()));
    assert!(world.has_component(ball, physics.verlet_type()));
    assert!(world.has_component(ball, physics.collider_type()));

    let b = body(&world, &physics, ball);
    assert!(!b.is_sleeping());
    assert_eq!(b.sleep_timer, 0);
    assert_eq!(b.old_position, Vec3::new(1.0, 2.0, 0.0));
}

#[test]
fn test_stationary_body_counts_down_into_sleep() {
    let config = weightless();
    let (mut world, mut physics) = setup(&config);
    let ball = physics.create_circle(&mut world, Vec3::ZERO, 5.0, 1.0);

    // Zero acceleration and old_position == position: the body stays put
    // and accumulates sleep frames.
    for frame in 1..config.sleep_frame_threshold {
        physics.integrate(&mut world, DT);
        let b = body(&world, &physics, ball);
        assert!(!b.is_sleeping(), "should still be awake at frame {frame}");
        assert_eq!(b.sleep_timer, frame);
        assert_eq!(position(&world, &physics, ball), Vec3::ZERO);
    }

    physics.integrate(&mut world, DT);
    let b = body(&world, &physics, ball);
    assert!(b.is_sleeping());
    assert_eq!(b.velocity, Vec3::ZERO);
    assert_eq!(b.acceleration, Vec3::ZERO);
    assert_eq!(position(&world, &physics, ball), Vec3::ZERO);
}

#[test]
fn test_fast_frames_reset_the_sleep_timer() {
    let config = weightless();
    let (mut world, mut physics) = setup(&config);
    let ball = physics.create_circle(&mut world, Vec3::ZERO, 5.0, 1.0);

    physics.integrate(&mut world, DT);
    assert_eq!(body(&world, &physics, ball).sleep_timer, 1);

    // Yank the body: derived speed jumps above the sleep threshold.
    world
        .get_component_mut::<Transform>(ball, physics.transform_type())
        .unwrap()
        .position = Vec3::new(1.0, 0.0, 0.0);
    physics.integrate(&mut world, DT);
    assert_eq!(body(&world, &physics, ball).sleep_timer, 0);
}

#[test]
fn test_sleeping_body_wakes_on_derived_speed() {
    let config = weightless();
    let (mut world, mut physics) = setup(&config);
    let ball = physics.create_circle(&mut world, Vec3::ZERO, 5.0, 1.0);

    world
        .get_component_mut::<VerletBody>(ball, physics.verlet_type())
        .unwrap()
        .fall_asleep();

    // A displaced transform gives a derived speed of 60 units/s, well
    // above the wake threshold.
    world
        .get_component_mut::<Transform>(ball, physics.transform_type())
        .unwrap()
        .position = Vec3::new(1.0, 0.0, 0.0);

    physics.integrate(&mut world, DT);
    assert!(!body(&world, &physics, ball).is_sleeping());
}

#[test]
fn test_sleeping_body_ignores_subthreshold_motion() {
    let config = weightless();
    let (mut world, mut physics) = setup(&config);
    let ball = physics.create_circle(&mut world, Vec3::ZERO, 5.0, 1.0);

    world
        .get_component_mut::<VerletBody>(ball, physics.verlet_type())
        .unwrap()
        .fall_asleep();

    for _ in 0..10 {
        physics.integrate(&mut world, DT);
    }
    let b = body(&world, &physics, ball);
    assert!(b.is_sleeping());
    assert_eq!(position(&world, &physics, ball), Vec3::ZERO);
}

#[test]
fn test_zero_step_is_ignored() {
    let (mut world, mut physics) = setup(&PhysicsConfig::default());
    let ball = physics.create_circle(&mut world, Vec3::new(0.0, 10.0, 0.0), 2.0, 1.0);

    physics.integrate(&mut world, 0.0);

    let b = body(&world, &physics, ball);
    assert_eq!(position(&world, &physics, ball), Vec3::new(0.0, 10.0, 0.0));
    assert_eq!(b.sleep_timer, 0);
}

#[test]
fn test_narrow_phase_hit_and_miss() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let hit = collide_circles(
        Vec3::ZERO,
        5.0,
        Vec3::new(8.0, 0.0, 0.0),
        5.0,
        &mut rng,
    )
    .unwrap();
    assert!((hit.penetration - 2.0).abs() < 1e-5);
    assert!((hit.normal.x - 1.0).abs() < 1e-5);
    assert!(hit.normal.y.abs() < 1e-5);

    assert!(collide_circles(
        Vec3::ZERO,
        5.0,
        Vec3::new(20.0, 0.0, 0.0),
        5.0,
        &mut rng
    )
    .is_none());
}

#[test]
fn test_resolution_strictly_separates_the_pair() {
    let (mut world, mut physics) = setup(&weightless());
    let a = physics.create_circle(&mut world, Vec3::ZERO, 5.0, 1.0);
    let b = physics.create_circle(&mut world, Vec3::new(4.0, 0.0, 0.0), 5.0, 1.0);

    let before = (position(&world, &physics, b) - position(&world, &physics, a))
        .xy()
        .length();
    physics.solve_collisions(&mut world);
    let after = (position(&world, &physics, b) - position(&world, &physics, a))
        .xy()
        .length();

    assert!(
        after > before + 1e-4,
        "resolution must increase center distance ({before} -> {after})"
    );
}

#[test]
fn test_equal_masses_split_the_correction_evenly() {
    let (mut world, mut physics) = setup(&weightless());
    let a = physics.create_circle(&mut world, Vec3::ZERO, 5.0, 1.0);
    let b = physics.create_circle(&mut world, Vec3::new(4.0, 0.0, 0.0), 5.0, 1.0);

    physics.solve_collisions(&mut world);

    let pa = position(&world, &physics, a);
    let pb = position(&world, &physics, b);
    // Both moved, in opposite directions, by the same amount.
    assert!(pa.x < 0.0);
    assert!(pb.x > 4.0);
    assert!((pa.x.abs() - (pb.x - 4.0)).abs() < 1e-4);
}

#[test]
fn test_resolution_wakes_sleeping_bodies() {
    let (_world, mut physics) = setup(&weightless());

    let mut t1 = Transform::at(Vec3::ZERO);
    let mut v1 = VerletBody::awake_at(Vec3::ZERO);
    v1.fall_asleep();
    let c1 = CircleCollider::new(10.0, 1.0, 0.6);

    let mut t2 = Transform::at(Vec3::new(5.0, 0.0, 0.0));
    let mut v2 = VerletBody::awake_at(Vec3::new(5.0, 0.0, 0.0));
    let c2 = CircleCollider::new(10.0, 1.0, 0.6);

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let contact = collide_circles(t1.position, c1.radius, t2.position, c2.radius, &mut rng)
        .unwrap();
    physics.resolve_contact(&mut t1, &mut v1, &c1, &mut t2, &mut v2, &c2, contact);

    assert!(!v1.is_sleeping());
    assert_eq!(v1.sleep_timer, 0);
}

#[test]
fn test_deep_overlap_correction_is_clamped() {
    let (mut world, mut physics) = setup(&weightless());
    // Fully coincident except a hair apart: raw penetration would be ~10.
    let a = physics.create_circle(&mut world, Vec3::ZERO, 5.0, 1.0);
    let b = physics.create_circle(&mut world, Vec3::new(0.01, 0.0, 0.0), 5.0, 1.0);

    physics.solve_collisions(&mut world);

    let gap = (position(&world, &physics, b) - position(&world, &physics, a))
        .xy()
        .length();
    // One sweep corrects at most max_penetration_ratio * correction_factor
    // of the radius sum; full separation takes several iterations.
    assert!(gap > 0.01);
    assert!(gap < 10.0);
}

#[test]
fn test_boundary_clamps_radially() {
    let (mut world, mut physics) = setup(&PhysicsConfig::default());
    let ball = physics.create_circle(&mut world, Vec3::new(150.0, 0.0, 0.0), 5.0, 1.0);

    physics.apply_constraints(&mut world);

    let pos = position(&world, &physics, ball);
    assert!((pos.x - 95.0).abs() < 1e-3, "expected 95, got {}", pos.x);
    assert!(pos.y.abs() < 1e-3);
}

#[test]
fn test_boundary_leaves_interior_bodies_alone() {
    let (mut world, mut physics) = setup(&PhysicsConfig::default());
    let ball = physics.create_circle(&mut world, Vec3::new(50.0, 20.0, 0.0), 5.0, 1.0);

    physics.apply_constraints(&mut world);

    assert_eq!(position(&world, &physics, ball), Vec3::new(50.0, 20.0, 0.0));
}

#[test]
fn test_sleeping_bodies_are_invisible_to_the_broad_phase() {
    // A sleeping body is never inserted into the grid, so an awake body
    // overlapping it produces no contact and neither moves. Settled piles
    // stay cheap; the cost is that only constraints or integration can
    // disturb them.
    let (mut world, mut physics) = setup(&weightless());
    let mover = physics.create_circle(&mut world, Vec3::ZERO, 5.0, 1.0);
    let sleeper = physics.create_circle(&mut world, Vec3::new(4.0, 0.0, 0.0), 5.0, 1.0);

    world
        .get_component_mut::<VerletBody>(sleeper, physics.verlet_type())
        .unwrap()
        .fall_asleep();

    let mover_before = position(&world, &physics, mover);
    let sleeper_before = position(&world, &physics, sleeper);

    physics.solve_collisions(&mut world);

    assert_eq!(position(&world, &physics, mover), mover_before);
    assert_eq!(position(&world, &physics, sleeper), sleeper_before);
    assert!(body(&world, &physics, sleeper).is_sleeping());
}

#[test]
fn test_entities_missing_components_are_skipped() {
    let (mut world, mut physics) = setup(&PhysicsConfig::default());

    // A bare entity and a transform-only entity must not disturb the pass.
    let bare = world.create_entity();
    let transform_only = world.create_entity();
    if let Some(t) = world.add_component::<Transform>(transform_only, physics.transform_type()) {
        *t = Transform::at(Vec3::new(500.0, 0.0, 0.0));
    }

    let ball = physics.create_circle(&mut world, Vec3::new(0.0, 10.0, 0.0), 2.0, 1.0);

    physics.step(&mut world, DT);

    assert!(world.is_active(bare));
    // No collider: the boundary constraint does not apply either.
    assert_eq!(
        position(&world, &physics, transform_only),
        Vec3::new(500.0, 0.0, 0.0)
    );
    assert!(!ball.is_null());
}
