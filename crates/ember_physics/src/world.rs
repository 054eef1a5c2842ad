//! # Physics World
//!
//! Verlet integration, sleep/wake management, broad+narrow phase collision
//! solving, and boundary containment, all driven over component arrays owned
//! by the core store.
//!
//! The world registers its own component types ([`VerletBody`],
//! [`CircleCollider`]) at construction and borrows the `Transform` type
//! handle from the caller - position is the integrated state, and the
//! `Transform` position field is the only physics output other subsystems
//! observe.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ember_core::{Arena, ArenaStats, ComponentType, EntityId, Transform, Vec3, World};

use crate::components::{CircleCollider, VerletBody};
use crate::config::PhysicsConfig;
use crate::error::PhysicsResult;
use crate::spatial::SpatialGrid;

/// Distance below which two centers are treated as coincident and the
/// contact normal falls back to a random direction instead of dividing by
/// (nearly) zero.
const CONTACT_EPSILON: f32 = 0.001;

/// The spatial grid spans the boundary diameter with some margin.
const GRID_SPAN_FACTOR: f32 = 2.2;

/// Cadence, in solve calls, of the sleep-census debug log.
const SLEEP_CENSUS_INTERVAL: u64 = 300;

/// A detected circle-circle overlap.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Unit vector from the first body's center toward the second's.
    pub normal: Vec3,
    /// Overlap depth along the normal.
    pub penetration: f32,
}

/// Narrow-phase circle-circle test on the x/y plane.
///
/// Returns the contact when the circles overlap: penetration is
/// `(r1 + r2) - distance` and the normal points from the first center to
/// the second. Nearly coincident centers (distance below a small epsilon)
/// get a uniformly random unit normal - not physically meaningful, but it
/// keeps NaNs out of the solver.
pub fn collide_circles<R: Rng>(
    pos1: Vec3,
    r1: f32,
    pos2: Vec3,
    r2: f32,
    rng: &mut R,
) -> Option<Contact> {
    let diff = pos2 - pos1;
    let distance_sq = diff.xy().length_squared();
    let radius_sum = r1 + r2;
    if distance_sq >= radius_sum * radius_sum {
        return None;
    }

    let distance = distance_sq.sqrt();
    let penetration = radius_sum - distance;
    let normal = if distance > CONTACT_EPSILON {
        diff * (1.0 / distance)
    } else {
        random_unit_xy(rng)
    };

    Some(Contact {
        normal,
        penetration,
    })
}

/// A uniformly random unit vector on the x/y plane.
fn random_unit_xy<R: Rng>(rng: &mut R) -> Vec3 {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    Vec3::new(angle.cos(), angle.sin(), 0.0)
}

/// The physics simulation world.
///
/// One instance drives all bodies in a store. Each frame runs one
/// integration pass followed by `collision_iterations` sweeps of
/// (solve collisions, apply constraints) - a fixed-point relaxation, since
/// many simultaneously overlapping bodies need several sweeps to converge.
pub struct PhysicsWorld {
    /// Borrowed handle; the transform type belongs to the rendering side.
    transform_type: ComponentType,
    verlet_type: ComponentType,
    collider_type: ComponentType,

    gravity: Vec3,
    damping: f32,
    collision_iterations: u32,

    boundary_center: Vec3,
    boundary_radius: f32,

    restitution: f32,
    correction_factor: f32,
    max_penetration_ratio: f32,
    sleep_velocity_threshold: f32,
    wake_velocity_threshold: f32,
    sleep_frame_threshold: u32,

    grid: SpatialGrid,
    /// Frame-scoped arena backing the grid's node lists; reset every sweep.
    spatial_arena: Arena,
    /// Reused broad-phase candidate buffer; its capacity is the hard cap.
    candidates: Vec<EntityId>,
    rng: ChaCha8Rng,
    /// Total solve sweeps run, for diagnostics cadence.
    solve_calls: u64,
}

impl PhysicsWorld {
    /// Creates a physics world over `world`, registering its component
    /// types and building the spatial grid and frame arena.
    ///
    /// `transform_type` is the store handle of the caller-registered
    /// `Transform` component; physics never defines that type itself.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or component registration
    /// exhausts the store.
    pub fn new(
        world: &mut World,
        transform_type: ComponentType,
        config: &PhysicsConfig,
    ) -> PhysicsResult<Self> {
        config.validate()?;

        let verlet_type = world.register_component::<VerletBody>()?;
        let collider_type = world.register_component::<CircleCollider>()?;

        let span = config.boundary_radius * GRID_SPAN_FACTOR;
        let origin = Vec3::new(-span / 2.0, -span / 2.0, 0.0);
        let grid = SpatialGrid::new(origin, span, span, config.cell_size);
        let spatial_arena = Arena::new(config.spatial_arena_bytes);

        tracing::info!(
            transform = transform_type.index(),
            verlet = verlet_type.index(),
            collider = collider_type.index(),
            arena_bytes = spatial_arena.capacity(),
            "physics world initialized"
        );

        Ok(Self {
            transform_type,
            verlet_type,
            collider_type,
            gravity: Vec3::new(config.gravity[0], config.gravity[1], config.gravity[2]),
            damping: config.damping,
            collision_iterations: config.collision_iterations,
            boundary_center: Vec3::ZERO,
            boundary_radius: config.boundary_radius,
            restitution: config.restitution,
            correction_factor: config.correction_factor,
            max_penetration_ratio: config.max_penetration_ratio,
            sleep_velocity_threshold: config.sleep_velocity_threshold,
            wake_velocity_threshold: config.wake_velocity_threshold,
            sleep_frame_threshold: config.sleep_frame_threshold,
            grid,
            spatial_arena,
            candidates: Vec::with_capacity(config.candidate_capacity),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            solve_calls: 0,
        })
    }

    /// The borrowed `Transform` component type handle.
    #[inline]
    #[must_use]
    pub const fn transform_type(&self) -> ComponentType {
        self.transform_type
    }

    /// The registered [`VerletBody`] component type handle.
    #[inline]
    #[must_use]
    pub const fn verlet_type(&self) -> ComponentType {
        self.verlet_type
    }

    /// The registered [`CircleCollider`] component type handle.
    #[inline]
    #[must_use]
    pub const fn collider_type(&self) -> ComponentType {
        self.collider_type
    }

    /// Combined mask of the component types the physics system operates on.
    #[inline]
    #[must_use]
    pub const fn declared_mask(&self) -> u64 {
        self.transform_type.bit() | self.verlet_type.bit() | self.collider_type.bit()
    }

    /// Current gravity vector.
    #[inline]
    #[must_use]
    pub const fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Center of the circular world boundary.
    #[inline]
    #[must_use]
    pub const fn boundary_center(&self) -> Vec3 {
        self.boundary_center
    }

    /// Radius of the circular world boundary.
    #[inline]
    #[must_use]
    pub const fn boundary_radius(&self) -> f32 {
        self.boundary_radius
    }

    /// Usage snapshot of the frame arena backing the spatial grid.
    #[must_use]
    pub const fn spatial_stats(&self) -> ArenaStats {
        self.spatial_arena.stats()
    }

    /// Moves or resizes the circular world boundary.
    pub fn set_boundary(&mut self, center: Vec3, radius: f32) {
        self.boundary_center = center;
        self.boundary_radius = radius;
    }

    /// Creates an entity with the full physics trio: `Transform` at
    /// `position` (identity scale), an awake [`VerletBody`], and a
    /// [`CircleCollider`] carrying the world's default restitution.
    ///
    /// Propagates [`EntityId::NULL`] when the store is out of entities.
    pub fn create_circle(
        &mut self,
        world: &mut World,
        position: Vec3,
        radius: f32,
        mass: f32,
    ) -> EntityId {
        let entity = world.create_entity();
        if entity.is_null() {
            return entity;
        }

        if let Some(transform) = world.add_component::<Transform>(entity, self.transform_type) {
            *transform = Transform::at(position);
        }
        if let Some(body) = world.add_component::<VerletBody>(entity, self.verlet_type) {
            *body = VerletBody::awake_at(position);
        }
        if let Some(collider) = world.add_component::<CircleCollider>(entity, self.collider_type) {
            *collider = CircleCollider::new(radius, mass, self.restitution);
        }

        entity
    }

    /// Advances the simulation by one frame.
    ///
    /// Integration runs once; the (solve, constrain) pair is then repeated
    /// `collision_iterations` times for stability. Delta-time clamping is
    /// the caller's policy - the world integrates whatever step it is given.
    pub fn step(&mut self, world: &mut World, delta_time: f32) {
        self.integrate(world, delta_time);
        for _ in 0..self.collision_iterations {
            self.solve_collisions(world);
            self.apply_constraints(world);
        }
    }

    /// Verlet integration pass over every entity carrying a `Transform`
    /// and a [`VerletBody`]; entities missing either are silently skipped.
    ///
    /// Velocity is derived from the position delta purely for threshold
    /// checks - position itself is the integrated state. Sleeping bodies
    /// only test their wake conditions; awake bodies accumulate gravity,
    /// take the damped Verlet step, and run the sleep timer. Zero or
    /// negative steps are ignored.
    pub fn integrate(&mut self, world: &mut World, delta_time: f32) {
        if delta_time <= 0.0 {
            return;
        }

        for raw in 1..world.next_entity_id() {
            let entity = EntityId::from_raw(raw);
            if !world.is_active(entity) {
                continue;
            }
            let Some(transform) = world
                .get_component::<Transform>(entity, self.transform_type)
                .copied()
            else {
                continue;
            };
            let Some(mut body) = world
                .get_component::<VerletBody>(entity, self.verlet_type)
                .copied()
            else {
                continue;
            };

            let current = transform.position;
            let velocity = (current - body.old_position) * (1.0 / delta_time);
            let speed = velocity.xy().length();
            body.velocity = velocity;

            if body.is_sleeping() {
                let accel_magnitude = body.acceleration.xy().length();
                if speed > self.wake_velocity_threshold
                    || accel_magnitude > self.wake_velocity_threshold
                {
                    body.wake();
                } else {
                    // Stay asleep; drop accumulated forces and skip motion.
                    body.acceleration = Vec3::ZERO;
                    if let Some(slot) = world.get_component_mut::<VerletBody>(entity, self.verlet_type)
                    {
                        *slot = body;
                    }
                    continue;
                }
            } else if speed < self.sleep_velocity_threshold {
                body.sleep_timer += 1;
                if body.sleep_timer >= self.sleep_frame_threshold {
                    body.fall_asleep();
                    if let Some(slot) = world.get_component_mut::<VerletBody>(entity, self.verlet_type)
                    {
                        *slot = body;
                    }
                    continue;
                }
            } else {
                body.sleep_timer = 0;
            }

            body.acceleration += self.gravity;

            let new_position = current
                + (current - body.old_position) * self.damping
                + body.acceleration * (delta_time * delta_time);

            body.old_position = current;
            body.acceleration = Vec3::ZERO;

            if let Some(slot) = world.get_component_mut::<VerletBody>(entity, self.verlet_type) {
                *slot = body;
            }
            if let Some(slot) = world.get_component_mut::<Transform>(entity, self.transform_type) {
                slot.position = new_position;
            }
        }
    }

    /// One collision sweep: rebuild the spatial grid from awake bodies,
    /// then narrow-phase and resolve grid-adjacent pairs.
    ///
    /// Sleeping bodies are never inserted into the grid and never act as
    /// the primary of a pair, so an awake body moving onto a resting one
    /// generates no contact until something else wakes it. Pairs are
    /// visited once by skipping candidates with a lower id than the
    /// primary.
    pub fn solve_collisions(&mut self, world: &mut World) {
        if self.solve_calls > 0 && self.solve_calls % SLEEP_CENSUS_INTERVAL == 0 {
            let (sleeping, total) = self.sleeping_bodies(world);
            tracing::debug!(sleeping, total, "sleep census");
        }
        self.solve_calls += 1;

        self.spatial_arena.reset();
        self.grid.clear();

        for raw in 1..world.next_entity_id() {
            let entity = EntityId::from_raw(raw);
            if !self.has_body(world, entity) {
                continue;
            }
            let Some(body) = world.get_component::<VerletBody>(entity, self.verlet_type) else {
                continue;
            };
            if body.is_sleeping() {
                continue;
            }
            let Some(transform) = world.get_component::<Transform>(entity, self.transform_type)
            else {
                continue;
            };
            let Some(collider) = world.get_component::<CircleCollider>(entity, self.collider_type)
            else {
                continue;
            };
            let (position, radius) = (transform.position, collider.radius);

            self.grid
                .insert(&mut self.spatial_arena, entity, position, radius);
        }

        let mut candidates = std::mem::take(&mut self.candidates);

        for raw in 1..world.next_entity_id() {
            let primary = EntityId::from_raw(raw);
            if !self.has_body(world, primary) {
                continue;
            }
            let Some(body) = world.get_component::<VerletBody>(primary, self.verlet_type) else {
                continue;
            };
            if body.is_sleeping() {
                continue;
            }
            let Some(transform) = world.get_component::<Transform>(primary, self.transform_type)
            else {
                continue;
            };
            let Some(collider) = world.get_component::<CircleCollider>(primary, self.collider_type)
            else {
                continue;
            };
            let (position, radius) = (transform.position, collider.radius);

            self.grid.potential_collisions(
                &self.spatial_arena,
                primary,
                position,
                radius,
                &mut candidates,
            );

            for &other in &candidates {
                if other.raw() < primary.raw() {
                    continue;
                }
                if !self.has_body(world, other) {
                    continue;
                }

                // Refetch both sides: earlier resolutions this sweep may
                // have moved either body.
                let Some(mut t1) = world
                    .get_component::<Transform>(primary, self.transform_type)
                    .copied()
                else {
                    continue;
                };
                let Some(mut v1) = world
                    .get_component::<VerletBody>(primary, self.verlet_type)
                    .copied()
                else {
                    continue;
                };
                let Some(c1) = world
                    .get_component::<CircleCollider>(primary, self.collider_type)
                    .copied()
                else {
                    continue;
                };
                let Some(mut t2) = world
                    .get_component::<Transform>(other, self.transform_type)
                    .copied()
                else {
                    continue;
                };
                let Some(mut v2) = world
                    .get_component::<VerletBody>(other, self.verlet_type)
                    .copied()
                else {
                    continue;
                };
                let Some(c2) = world
                    .get_component::<CircleCollider>(other, self.collider_type)
                    .copied()
                else {
                    continue;
                };

                let Some(contact) = collide_circles(
                    t1.position,
                    c1.radius,
                    t2.position,
                    c2.radius,
                    &mut self.rng,
                ) else {
                    continue;
                };

                self.resolve_contact(&mut t1, &mut v1, &c1, &mut t2, &mut v2, &c2, contact);

                if let Some(slot) = world.get_component_mut::<Transform>(primary, self.transform_type)
                {
                    *slot = t1;
                }
                if let Some(slot) = world.get_component_mut::<VerletBody>(primary, self.verlet_type)
                {
                    *slot = v1;
                }
                if let Some(slot) = world.get_component_mut::<Transform>(other, self.transform_type)
                {
                    *slot = t2;
                }
                if let Some(slot) = world.get_component_mut::<VerletBody>(other, self.verlet_type) {
                    *slot = v2;
                }
            }
        }

        self.candidates = candidates;
    }

    /// Resolves one overlapping pair in place.
    ///
    /// Wakes both bodies, clamps penetration to a fraction of the radius
    /// sum, splits the positional correction by opposite mass ratio scaled
    /// by the correction factor, and applies a restitution impulse when the
    /// bodies are approaching along the (re-validated) contact normal.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_contact(
        &mut self,
        t1: &mut Transform,
        v1: &mut VerletBody,
        c1: &CircleCollider,
        t2: &mut Transform,
        v2: &mut VerletBody,
        c2: &CircleCollider,
        contact: Contact,
    ) {
        if v1.is_sleeping() {
            v1.wake();
        }
        if v2.is_sleeping() {
            v2.wake();
        }

        // Deep overlaps blow up the correction; cap them.
        let max_penetration = (c1.radius + c2.radius) * self.max_penetration_ratio;
        let penetration = contact.penetration.min(max_penetration);

        let total_mass = c1.mass + c2.mass;
        let mass_ratio_1 = c2.mass / total_mass;
        let mass_ratio_2 = c1.mass / total_mass;

        let mut normal = Vec3::new(contact.normal.x, contact.normal.y, 0.0);
        let normal_length = normal.xy().length();
        if normal_length > CONTACT_EPSILON {
            normal = normal * (1.0 / normal_length);
        } else {
            normal = random_unit_xy(&mut self.rng);
        }

        let correction = normal * (penetration * self.correction_factor);
        t1.position -= correction * mass_ratio_1;
        t2.position += correction * mass_ratio_2;

        let relative_velocity = v1.velocity - v2.velocity;
        let approach = relative_velocity.dot(normal);
        if approach < 0.0 {
            let impulse = normal * (-(1.0 + self.restitution) * approach / 2.0);
            v1.velocity += impulse * mass_ratio_1;
            v2.velocity -= impulse * mass_ratio_2;
        }
    }

    /// Clamps every entity with a `Transform` and a [`CircleCollider`]
    /// inside the circular world boundary.
    ///
    /// A body farther than `boundary_radius - collider_radius` from the
    /// center (planar distance) is placed exactly on that circle along its
    /// current radial direction - a hard constraint, not a spring.
    pub fn apply_constraints(&self, world: &mut World) {
        for raw in 1..world.next_entity_id() {
            let entity = EntityId::from_raw(raw);
            if !world.is_active(entity) {
                continue;
            }
            let Some(transform) = world
                .get_component::<Transform>(entity, self.transform_type)
                .copied()
            else {
                continue;
            };
            let Some(collider) = world
                .get_component::<CircleCollider>(entity, self.collider_type)
                .copied()
            else {
                continue;
            };

            let to_center = self.boundary_center - transform.position;
            let distance = to_center.xy().length();
            let max_distance = self.boundary_radius - collider.radius;

            if distance > max_distance {
                let direction = to_center * (1.0 / distance);
                let clamped = self.boundary_center - direction * max_distance;
                if let Some(slot) = world.get_component_mut::<Transform>(entity, self.transform_type)
                {
                    slot.position = clamped;
                }
            }
        }
    }

    /// Counts sleeping bodies: `(sleeping, total)` over every active
    /// entity carrying a [`VerletBody`].
    #[must_use]
    pub fn sleeping_bodies(&self, world: &World) -> (usize, usize) {
        let mut sleeping = 0;
        let mut total = 0;
        for raw in 1..world.next_entity_id() {
            let entity = EntityId::from_raw(raw);
            if !world.is_active(entity) {
                continue;
            }
            let Some(body) = world.get_component::<VerletBody>(entity, self.verlet_type) else {
                continue;
            };
            total += 1;
            if body.is_sleeping() {
                sleeping += 1;
            }
        }
        (sleeping, total)
    }

    /// Whether an entity is active and carries the full physics trio.
    fn has_body(&self, world: &World, entity: EntityId) -> bool {
        world.is_active(entity)
            && world.has_component(entity, self.transform_type)
            && world.has_component(entity, self.verlet_type)
            && world.has_component(entity, self.collider_type)
    }
}
