//! # Arena Pool
//!
//! A growable set of [`Arena`]s behind a single allocation entry point.
//!
//! The pool allocates from a "current" arena and transparently creates a new
//! one (sized up for oversized requests) when it runs dry, falling back to
//! scanning earlier arenas before giving up. Component storage lives here for
//! the lifetime of the store; the pool is never reset mid-simulation.

use super::arena::{align_up, Arena, ArenaBlock, ArenaStats, ARENA_DEFAULT_SIZE};

/// Maximum number of arenas a pool will create.
pub const MAX_ARENAS: usize = 16;

/// Handle to a range of bytes inside an [`ArenaPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolBlock {
    /// Index of the owning arena within the pool.
    arena: usize,
    /// Block handle within that arena.
    block: ArenaBlock,
}

impl PoolBlock {
    /// Length of this block in bytes.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.block.len()
    }

    /// Whether the block is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.block.is_empty()
    }
}

/// A pool of bump arenas sharing one allocation front.
pub struct ArenaPool {
    arenas: Vec<Arena>,
    current: usize,
}

impl ArenaPool {
    /// Creates a pool with one default-sized arena.
    #[must_use]
    pub fn new() -> Self {
        let mut arenas = Vec::with_capacity(MAX_ARENAS);
        arenas.push(Arena::new(ARENA_DEFAULT_SIZE));
        Self { arenas, current: 0 }
    }

    /// Number of arenas currently in the pool.
    #[inline]
    #[must_use]
    pub fn arena_count(&self) -> usize {
        self.arenas.len()
    }

    /// Allocates `size` bytes, growing the pool if needed.
    ///
    /// Order of attempts: the current arena, then a freshly created arena
    /// (doubled and rounded up to the default size when the request is
    /// oversized), then a scan of every earlier arena. Exhaustion is logged
    /// and reported as `None`; the caller aborts the enclosing setup step.
    pub fn alloc(&mut self, size: usize) -> Option<PoolBlock> {
        if let Some(block) = self.arenas[self.current].alloc(size) {
            return Some(PoolBlock {
                arena: self.current,
                block,
            });
        }

        if self.arenas.len() < MAX_ARENAS {
            let new_size = if size > ARENA_DEFAULT_SIZE {
                align_up(size * 2, ARENA_DEFAULT_SIZE)
            } else {
                ARENA_DEFAULT_SIZE
            };
            self.arenas.push(Arena::new(new_size));
            self.current = self.arenas.len() - 1;
            return self.arenas[self.current].alloc(size).map(|block| PoolBlock {
                arena: self.current,
                block,
            });
        }

        for index in 0..self.arenas.len() {
            if index == self.current {
                continue;
            }
            if let Some(block) = self.arenas[index].alloc(size) {
                self.current = index;
                return Some(PoolBlock {
                    arena: index,
                    block,
                });
            }
        }

        tracing::error!(size, arenas = self.arenas.len(), "arena pool exhausted");
        None
    }

    /// Read access to a block's bytes.
    #[inline]
    #[must_use]
    pub fn bytes(&self, block: PoolBlock) -> &[u8] {
        self.arenas[block.arena].bytes(block.block)
    }

    /// Write access to a block's bytes.
    #[inline]
    pub fn bytes_mut(&mut self, block: PoolBlock) -> &mut [u8] {
        self.arenas[block.arena].bytes_mut(block.block)
    }

    /// Resets every arena in the pool.
    ///
    /// All outstanding [`PoolBlock`]s become stale; see [`Arena::reset`].
    pub fn reset(&mut self) {
        for arena in &mut self.arenas {
            arena.reset();
        }
        self.current = 0;
    }

    /// Returns an aggregated usage snapshot across all arenas.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        let mut stats = ArenaStats::default();
        for arena in &self.arenas {
            stats.total_size += arena.capacity();
            stats.used_bytes += arena.used();
        }
        stats.free_bytes = stats.total_size - stats.used_bytes;
        stats.arena_count = self.arenas.len();
        stats
    }
}

impl Default for ArenaPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_allocates_from_first_arena() {
        let mut pool = ArenaPool::new();
        let block = pool.alloc(64).unwrap();
        assert_eq!(block.len(), 64);
        assert_eq!(pool.arena_count(), 1);
    }

    #[test]
    fn test_pool_grows_when_current_is_full() {
        let mut pool = ArenaPool::new();
        let _ = pool.alloc(ARENA_DEFAULT_SIZE).unwrap();
        let block = pool.alloc(128).unwrap();
        assert_eq!(block.len(), 128);
        assert_eq!(pool.arena_count(), 2);
    }

    #[test]
    fn test_pool_sizes_up_for_oversized_requests() {
        let mut pool = ArenaPool::new();
        let big = ARENA_DEFAULT_SIZE * 3;
        let block = pool.alloc(big).unwrap();
        assert_eq!(block.len(), big);
        assert_eq!(pool.arena_count(), 2);
        assert!(pool.stats().total_size >= ARENA_DEFAULT_SIZE + big);
    }

    #[test]
    fn test_pool_falls_back_to_earlier_arenas() {
        let mut pool = ArenaPool::new();
        // Half-fill arena 0, then exhaust the pool's ability to grow.
        let _ = pool.alloc(ARENA_DEFAULT_SIZE / 2).unwrap();
        for _ in 1..MAX_ARENAS {
            let _ = pool.alloc(ARENA_DEFAULT_SIZE).unwrap();
        }
        assert_eq!(pool.arena_count(), MAX_ARENAS);

        // Small request lands in the remainder of arena 0.
        assert!(pool.alloc(ARENA_DEFAULT_SIZE / 4).is_some());
        assert_eq!(pool.arena_count(), MAX_ARENAS);

        // Nothing can satisfy a full-sized request any more.
        assert!(pool.alloc(ARENA_DEFAULT_SIZE).is_none());
    }

    #[test]
    fn test_pool_reset() {
        let mut pool = ArenaPool::new();
        let _ = pool.alloc(1000).unwrap();
        pool.reset();
        assert_eq!(pool.stats().used_bytes, 0);
    }

    #[test]
    fn test_pool_stats_aggregate() {
        let mut pool = ArenaPool::new();
        let _ = pool.alloc(100).unwrap();
        let stats = pool.stats();
        assert_eq!(stats.used_bytes, 100);
        assert_eq!(stats.arena_count, 1);
        assert_eq!(stats.free_bytes, stats.total_size - stats.used_bytes);
    }
}
