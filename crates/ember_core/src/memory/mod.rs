//! # Memory Management
//!
//! Bump-allocated arenas and a growable arena pool. All component storage
//! and per-frame scratch memory in the engine is carved out of these.
//!
//! ## Design Philosophy
//!
//! Memory is allocated in large blocks up front. During simulation:
//! - No heap allocations
//! - No individual frees; whole arenas are bulk-reset
//! - Predictable, flat latency

mod arena;
mod pool;

pub use arena::{Arena, ArenaBlock, ArenaStats, ARENA_ALIGNMENT, ARENA_DEFAULT_SIZE};
pub use pool::{ArenaPool, PoolBlock, MAX_ARENAS};
