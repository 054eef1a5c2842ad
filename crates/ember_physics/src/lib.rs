//! # EMBER Physics
//!
//! The physics world of the EMBER engine: Verlet-integrated circle bodies
//! over the arena-backed core store, with a sleep/wake optimization, a
//! per-frame rebuilt spatial hash grid for broad phase, and iterative
//! narrow-phase collision resolution inside a circular boundary.
//!
//! ## Per-frame pipeline
//!
//! ```text
//! Simulation::update(dt)
//!   -> scheduler -> physics system
//!        -> integrate once
//!        -> N x (solve collisions, apply constraints)
//!             solve: reset frame arena, rebuild grid from awake bodies,
//!                    narrow-phase grid-adjacent pairs
//! ```
//!
//! ## Non-goals
//!
//! Rigid-body rotation, continuous collision detection (fast bodies can
//! tunnel), and multi-threading are out of scope by design.

#![deny(unsafe_code)]

mod components;
mod config;
mod error;
mod simulation;
mod spatial;
mod world;

pub use components::{CircleCollider, VerletBody};
pub use config::PhysicsConfig;
pub use error::{PhysicsError, PhysicsResult};
pub use simulation::{SimState, Simulation};
pub use spatial::SpatialGrid;
pub use world::{collide_circles, Contact, PhysicsWorld};
