//! # Simulation Driver
//!
//! Composes the store, the physics world, and the scheduler into one
//! per-frame entry point. System functions stay plain `fn`s; they reach
//! world state through the scheduler's explicit context parameter instead
//! of a process-wide global.

use ember_core::{ComponentType, EntityId, Scheduler, Vec3, World};

use crate::config::PhysicsConfig;
use crate::error::PhysicsResult;
use crate::world::PhysicsWorld;

/// The state threaded through every system each tick.
pub struct SimState {
    /// The entity-component store.
    pub world: World,
    /// The physics world simulating over it.
    pub physics: PhysicsWorld,
}

/// The per-frame physics entry point, invoked through the scheduler.
fn physics_system(state: &mut SimState, delta_time: f32) {
    let SimState { world, physics } = state;
    physics.step(world, delta_time);
}

/// A complete simulation: store + physics + scheduler.
///
/// # Example
///
/// ```rust,ignore
/// let mut store = World::new();
/// let transform = store.register_component::<Transform>()?;
///
/// let mut sim = Simulation::new(store, transform, PhysicsConfig::default())?;
/// let ball = sim.spawn_circle(Vec3::new(0.0, 50.0, 0.0), 2.0, 1.0);
///
/// loop {
///     sim.update(delta_time.min(MAX_STEP)); // clamping is caller policy
/// }
/// ```
pub struct Simulation {
    state: SimState,
    scheduler: Scheduler<SimState>,
}

impl Simulation {
    /// Builds a simulation over an existing store.
    ///
    /// The caller registers `Transform` (it belongs to the rendering side)
    /// and passes its handle; physics component types are registered here
    /// and the physics system is scheduled with its declared mask.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or component registration
    /// exhausts the store.
    pub fn new(
        mut world: World,
        transform_type: ComponentType,
        config: &PhysicsConfig,
    ) -> PhysicsResult<Self> {
        let physics = PhysicsWorld::new(&mut world, transform_type, config)?;

        let mut scheduler = Scheduler::new();
        let mask = physics.declared_mask();
        scheduler.register(physics_system, mask);
        tracing::info!(mask, "physics system registered");

        Ok(Self {
            state: SimState { world, physics },
            scheduler,
        })
    }

    /// Runs one tick through the scheduler.
    pub fn update(&mut self, delta_time: f32) {
        self.scheduler.update(&mut self.state, delta_time);
    }

    /// Spawns a circle body; see [`PhysicsWorld::create_circle`].
    pub fn spawn_circle(&mut self, position: Vec3, radius: f32, mass: f32) -> EntityId {
        let SimState { world, physics } = &mut self.state;
        physics.create_circle(world, position, radius, mass)
    }

    /// Moves or resizes the world boundary.
    pub fn set_boundary(&mut self, center: Vec3, radius: f32) {
        self.state.physics.set_boundary(center, radius);
    }

    /// The entity-component store.
    #[inline]
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.state.world
    }

    /// Mutable access to the store.
    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.state.world
    }

    /// The physics world.
    #[inline]
    #[must_use]
    pub const fn physics(&self) -> &PhysicsWorld {
        &self.state.physics
    }

    /// Mutable access to the physics world.
    #[inline]
    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.state.physics
    }

    /// Number of scheduled systems.
    #[inline]
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.scheduler.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Transform;

    fn simulation() -> Simulation {
        let mut world = World::new();
        let transform = world.register_component::<Transform>().unwrap();
        Simulation::new(world, transform, &PhysicsConfig::default()).unwrap()
    }

    #[test]
    fn test_physics_system_is_scheduled() {
        let sim = simulation();
        assert_eq!(sim.system_count(), 1);
    }

    #[test]
    fn test_update_applies_gravity() {
        let mut sim = simulation();
        let ball = sim.spawn_circle(Vec3::new(0.0, 50.0, 0.0), 2.0, 1.0);
        assert!(!ball.is_null());

        let before = sim
            .world()
            .get_component::<Transform>(ball, sim.physics().transform_type())
            .unwrap()
            .position;

        for _ in 0..10 {
            sim.update(1.0 / 60.0);
        }

        let after = sim
            .world()
            .get_component::<Transform>(ball, sim.physics().transform_type())
            .unwrap()
            .position;
        assert!(after.y < before.y, "gravity should pull the body down");
    }
}
