//! # Physics Error Types
//!
//! Errors surfaced while constructing or configuring the physics world.
//! Per-frame simulation never errors: missing components are skipped and
//! allocation failure degrades the current frame.

use thiserror::Error;

use ember_core::CoreError;

/// Errors that can occur in the physics system.
#[derive(Error, Debug)]
pub enum PhysicsError {
    /// Registering a physics component type with the store failed.
    #[error("component registration failed: {0}")]
    Registration(#[from] CoreError),

    /// The tuning configuration is malformed or out of range.
    #[error("invalid physics configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be read.
    #[error("failed to read physics configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for physics operations.
pub type PhysicsResult<T> = Result<T, PhysicsError>;
