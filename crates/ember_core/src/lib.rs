//! # EMBER Core
//!
//! The simulation store of the EMBER engine: an arena-backed entity
//! component system sized for thousands of per-frame updated entities.
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in the hot path** - component storage is carved
//!    out of bump arenas at registration time
//! 2. **Dense, id-indexed arrays** - O(1) component access, linear scans
//!    over all issued ids
//! 3. **Single-threaded** - one caller drives the whole tick; no locks
//!
//! ## Example
//!
//! ```rust,ignore
//! use ember_core::{Transform, World};
//!
//! let mut world = World::new();
//! let transform = world.register_component::<Transform>()?;
//! let entity = world.create_entity();
//! *world.add_component::<Transform>(entity, transform).unwrap() =
//!     Transform::identity();
//! ```

#![deny(unsafe_code)]

pub mod components;
pub mod ecs;
mod error;
pub mod math;
pub mod memory;

pub use components::{Color, Renderable, ShapeKind, Transform};
pub use ecs::{
    Component, ComponentType, EntityId, EntityInfo, Scheduler, World, MAX_COMPONENT_TYPES,
    MAX_ENTITIES, MAX_SYSTEMS,
};
pub use error::CoreError;
pub use math::{Vec2, Vec3};
pub use memory::{
    Arena, ArenaBlock, ArenaPool, ArenaStats, PoolBlock, ARENA_ALIGNMENT, ARENA_DEFAULT_SIZE,
    MAX_ARENAS,
};
