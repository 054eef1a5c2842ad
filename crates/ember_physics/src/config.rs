//! # Physics Tuning Configuration
//!
//! All tunable constants of the physics world, loadable from a TOML file at
//! startup. Every field has a default matching the engine's reference
//! tuning; a config file only needs to name the values it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, PhysicsResult};

const DEFAULT_GRAVITY: [f32; 3] = [0.0, -200.0, 0.0];
const DEFAULT_DAMPING: f32 = 0.98;
const DEFAULT_COLLISION_ITERATIONS: u32 = 8;
const DEFAULT_BOUNDARY_RADIUS: f32 = 100.0;
const DEFAULT_CELL_SIZE: f32 = 20.0;
const DEFAULT_RESTITUTION: f32 = 0.6;
const DEFAULT_CORRECTION_FACTOR: f32 = 0.7;
const DEFAULT_MAX_PENETRATION_RATIO: f32 = 0.8;
const DEFAULT_SLEEP_VELOCITY: f32 = 1.0;
const DEFAULT_WAKE_VELOCITY: f32 = 5.0;
const DEFAULT_SLEEP_FRAMES: u32 = 30;
const DEFAULT_CANDIDATE_CAPACITY: usize = 16384;
const DEFAULT_SPATIAL_ARENA_BYTES: usize = 16 * 1024 * 1024;

/// Tuning parameters for a [`crate::PhysicsWorld`].
///
/// # Example
///
/// ```rust,ignore
/// let config = PhysicsConfig::from_toml("data/physics.toml")?;
/// let world = PhysicsWorld::new(&mut store, transform_type, config)?;
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration in world units/s^2. Default `[0, -200, 0]`.
    pub gravity: [f32; 3],
    /// Velocity damping folded into the Verlet step. Default `0.98`.
    pub damping: f32,
    /// Solve/constrain sweeps per frame. Default `8`.
    pub collision_iterations: u32,
    /// Radius of the circular world boundary. Default `100`.
    pub boundary_radius: f32,
    /// Spatial grid cell size in world units. Default `20`.
    pub cell_size: f32,
    /// Shared restitution applied to approaching contact pairs. Default `0.6`.
    pub restitution: f32,
    /// Fraction of penetration corrected per sweep; below 1 to avoid
    /// overshoot. Default `0.7`.
    pub correction_factor: f32,
    /// Penetration clamp as a fraction of the radius sum. Default `0.8`.
    pub max_penetration_ratio: f32,
    /// Speed below which a body accumulates sleep frames. Default `1.0`.
    pub sleep_velocity_threshold: f32,
    /// Speed or acceleration magnitude that wakes a sleeping body.
    /// Default `5.0`.
    pub wake_velocity_threshold: f32,
    /// Consecutive slow frames before a body falls asleep. Default `30`.
    pub sleep_frame_threshold: u32,
    /// Fixed capacity of the broad-phase candidate buffer; overflow
    /// silently truncates. Default `16384`.
    pub candidate_capacity: usize,
    /// Size of the per-frame spatial arena in bytes. Default `16 MiB`.
    pub spatial_arena_bytes: usize,
    /// Seed for the deterministic contact-fallback RNG. Default `0`.
    pub rng_seed: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            damping: DEFAULT_DAMPING,
            collision_iterations: DEFAULT_COLLISION_ITERATIONS,
            boundary_radius: DEFAULT_BOUNDARY_RADIUS,
            cell_size: DEFAULT_CELL_SIZE,
            restitution: DEFAULT_RESTITUTION,
            correction_factor: DEFAULT_CORRECTION_FACTOR,
            max_penetration_ratio: DEFAULT_MAX_PENETRATION_RATIO,
            sleep_velocity_threshold: DEFAULT_SLEEP_VELOCITY,
            wake_velocity_threshold: DEFAULT_WAKE_VELOCITY,
            sleep_frame_threshold: DEFAULT_SLEEP_FRAMES,
            candidate_capacity: DEFAULT_CANDIDATE_CAPACITY,
            spatial_arena_bytes: DEFAULT_SPATIAL_ARENA_BYTES,
            rng_seed: 0,
        }
    }
}

impl PhysicsConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] on parse or validation
    /// failure.
    pub fn from_toml_str(text: &str) -> PhysicsResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| PhysicsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::Io`] when the file cannot be read and
    /// [`PhysicsError::InvalidConfig`] on parse or validation failure.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> PhysicsResult<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> PhysicsResult<()> {
        if !(self.cell_size > 0.0) {
            return Err(PhysicsError::InvalidConfig(
                "cell_size must be positive".into(),
            ));
        }
        if !(self.boundary_radius > 0.0) {
            return Err(PhysicsError::InvalidConfig(
                "boundary_radius must be positive".into(),
            ));
        }
        if self.collision_iterations == 0 {
            return Err(PhysicsError::InvalidConfig(
                "collision_iterations must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(PhysicsError::InvalidConfig(
                "damping must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.correction_factor) {
            return Err(PhysicsError::InvalidConfig(
                "correction_factor must be in [0, 1]".into(),
            ));
        }
        if self.candidate_capacity == 0 {
            return Err(PhysicsError::InvalidConfig(
                "candidate_capacity must be positive".into(),
            ));
        }
        if self.spatial_arena_bytes == 0 {
            return Err(PhysicsError::InvalidConfig(
                "spatial_arena_bytes must be positive".into(),
            ));
        }
        Ok(())
    }
}
