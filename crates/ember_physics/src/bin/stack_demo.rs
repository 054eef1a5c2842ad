//! # Falling Circles Demo
//!
//! Headless settling test: drops a grid of circles into the circular
//! boundary and reports how the pile settles and falls asleep.
//!
//! ## Usage
//!
//! ```bash
//! stack_demo --count 1000 --frames 600 --seed 42
//! ```

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ember_core::{Color, Renderable, Transform, Vec3, World};
use ember_physics::{PhysicsConfig, Simulation};

/// Circle radius range, world units.
const RADIUS_MIN: f32 = 1.0;
const RADIUS_MAX: f32 = 2.0;
/// Mass scales with the squared radius.
const MASS_MULTIPLIER: f32 = 0.1;
/// Fraction of the boundary the spawn grid spans.
const GRID_SPACING_MULTIPLIER: f32 = 0.6;
/// Jitter applied to grid positions, as a fraction of the spacing.
const GRID_POSITION_RANDOMNESS: f32 = 0.3;
/// Spawn offset above the boundary center.
const SPAWN_HEIGHT_OFFSET: f32 = 30.0;
/// Upper bound on the integration step, seconds.
const MAX_DELTA_TIME: f32 = 0.033;
/// Frames between progress reports.
const REPORT_INTERVAL: u32 = 50;

fn random_in(rng: &mut ChaCha8Rng, min: f32, max: f32) -> f32 {
    min + rng.gen::<f32>() * (max - min)
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut count = 1000usize;
    let mut frames = 600u32;
    let mut seed = 42u64;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "--frames" | "-f" => {
                if i + 1 < args.len() {
                    frames = args[i + 1].parse().unwrap_or(600);
                    i += 1;
                }
            }
            "--seed" | "-s" => {
                if i + 1 < args.len() {
                    seed = args[i + 1].parse().unwrap_or(42);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: stack_demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of circles to drop (default: 1000)");
                println!("  -f, --frames <N>   Frames to simulate (default: 600)");
                println!("  -s, --seed <N>     RNG seed for spawn jitter (default: 42)");
                return;
            }
            _ => {}
        }
        i += 1;
    }

    println!("EMBER stack demo: {count} circles, {frames} frames");

    let mut store = World::new();
    let transform_type = store
        .register_component::<Transform>()
        .expect("transform registration");
    let renderable_type = store
        .register_component::<Renderable>()
        .expect("renderable registration");

    let config = PhysicsConfig {
        rng_seed: seed,
        ..PhysicsConfig::default()
    };
    let boundary_radius = config.boundary_radius;
    let mut sim = Simulation::new(store, transform_type, &config).expect("simulation setup");
    sim.set_boundary(Vec3::ZERO, boundary_radius);

    // Spawn in a jittered grid well above the boundary floor.
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let per_row = (count as f32).sqrt() as usize + 1;
    let spacing = (boundary_radius * GRID_SPACING_MULTIPLIER) / per_row as f32;
    let jitter = spacing * GRID_POSITION_RANDOMNESS;

    let mut spawned = 0usize;
    for index in 0..count {
        let radius = random_in(&mut rng, RADIUS_MIN, RADIUS_MAX);
        let mass = radius * radius * MASS_MULTIPLIER;

        let row = index / per_row;
        let col = index % per_row;
        let base_x = (col as f32 - per_row as f32 / 2.0) * spacing;
        let base_y = (row as f32 - per_row as f32 / 2.0) * spacing + SPAWN_HEIGHT_OFFSET;
        let position = Vec3::new(
            base_x + random_in(&mut rng, -jitter, jitter),
            base_y + random_in(&mut rng, -jitter, jitter),
            0.0,
        );

        let entity = sim.spawn_circle(position, radius, mass);
        if entity.is_null() {
            eprintln!("entity capacity reached after {spawned} circles");
            break;
        }
        let color = Color::new(
            random_in(&mut rng, 0.2, 1.0),
            random_in(&mut rng, 0.2, 1.0),
            random_in(&mut rng, 0.2, 1.0),
            1.0,
        );
        if let Some(slot) = sim
            .world_mut()
            .add_component::<Renderable>(entity, renderable_type)
        {
            *slot = Renderable::circle(radius, color);
        }
        spawned += 1;
    }

    let delta_time = (1.0f32 / 60.0).min(MAX_DELTA_TIME);
    let start = std::time::Instant::now();

    for frame in 1..=frames {
        sim.update(delta_time);

        if frame % REPORT_INTERVAL == 0 {
            let (sleeping, total) = {
                let physics = sim.physics();
                physics.sleeping_bodies(sim.world())
            };
            println!(
                "frame {frame:>5}: {sleeping}/{total} sleeping, spatial arena {} KiB used",
                sim.physics().spatial_stats().used_bytes / 1024
            );
        }
    }

    let elapsed = start.elapsed();
    let (sleeping, total) = sim.physics().sleeping_bodies(sim.world());
    println!();
    println!("simulated {frames} frames of {spawned} circles in {elapsed:?}");
    println!(
        "final: {sleeping}/{total} sleeping ({:.1}%)",
        if total > 0 {
            sleeping as f32 / total as f32 * 100.0
        } else {
            0.0
        }
    );
}
