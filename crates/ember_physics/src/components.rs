//! # Physics Components
//!
//! The two component types the physics world registers with the store.
//! Both are created together with a `Transform` as a trio by
//! [`crate::PhysicsWorld::create_circle`].

use bytemuck::{Pod, Zeroable};

use ember_core::Vec3;

/// Verlet-integrated body state.
///
/// Position is the integrated state and lives in `Transform`; velocity here
/// is derived each step from the position delta and is only consulted for
/// sleep thresholds and restitution. The acceleration accumulator is
/// cleared every step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct VerletBody {
    /// Derived velocity, `(position - old_position) / dt` as of the last
    /// integration step.
    pub velocity: Vec3,
    /// Force accumulator for the current step.
    pub acceleration: Vec3,
    /// Position at the previous step.
    pub old_position: Vec3,
    /// Non-zero while the body sleeps (stored as a word to stay `Pod`).
    sleeping: u32,
    /// Consecutive frames spent below the sleep velocity threshold.
    pub sleep_timer: u32,
}

impl VerletBody {
    /// Creates an awake body at rest at `position`.
    #[inline]
    #[must_use]
    pub const fn awake_at(position: Vec3) -> Self {
        Self {
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            old_position: position,
            sleeping: 0,
            sleep_timer: 0,
        }
    }

    /// Whether the body is currently sleeping.
    #[inline]
    #[must_use]
    pub const fn is_sleeping(&self) -> bool {
        self.sleeping != 0
    }

    /// Wakes the body and restarts its sleep timer.
    #[inline]
    pub fn wake(&mut self) {
        self.sleeping = 0;
        self.sleep_timer = 0;
    }

    /// Puts the body to sleep, zeroing velocity and acceleration.
    #[inline]
    pub fn fall_asleep(&mut self) {
        self.sleeping = 1;
        self.velocity = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
    }
}

/// Circular collision shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct CircleCollider {
    /// Collision radius in world units.
    pub radius: f32,
    /// Mass used to split positional corrections and impulses.
    pub mass: f32,
    /// Bounciness of this collider.
    pub restitution: f32,
}

impl CircleCollider {
    /// Creates a collider.
    #[inline]
    #[must_use]
    pub const fn new(radius: f32, mass: f32, restitution: f32) -> Self {
        Self {
            radius,
            mass,
            restitution,
        }
    }
}
