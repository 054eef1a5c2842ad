//! # Core Error Types
//!
//! Errors surfaced by store setup operations. Hot-path operations never
//! error: they return sentinels or `None` and the caller skips.

use thiserror::Error;

/// Errors that can occur while setting up the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The component registration table is full.
    #[error("component type cap exceeded: {limit} types already registered")]
    ComponentLimitExceeded {
        /// The structural cap that was hit.
        limit: usize,
    },

    /// The arena pool could not satisfy a component array allocation.
    #[error("component storage allocation failed ({requested} bytes)")]
    StorageExhausted {
        /// Size of the failed request in bytes.
        requested: usize,
    },

    /// Zero-sized types carry no data and cannot be stored.
    #[error("zero-sized component types cannot be registered")]
    ZeroSizedComponent,

    /// The component's alignment exceeds what arena storage guarantees
    /// (see [`crate::memory::ARENA_ALIGNMENT`]).
    #[error("component alignment {align} exceeds arena alignment {limit}")]
    UnsupportedAlignment {
        /// The component type's alignment.
        align: usize,
        /// The arena's guaranteed alignment.
        limit: usize,
    },
}
