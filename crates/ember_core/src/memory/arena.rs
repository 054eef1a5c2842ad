//! # Arena Allocator
//!
//! A bump allocator for allocations that are freed all at once.
//!
//! Because the crate forbids `unsafe`, the arena does not hand out raw
//! pointers. `alloc` returns an [`ArenaBlock`] handle (offset + length) and
//! byte access goes through [`Arena::bytes`] / [`Arena::bytes_mut`]. The
//! backing store is a word array so that every default-aligned block can be
//! reinterpreted as a `Pod` value with alignment up to [`ARENA_ALIGNMENT`].

/// Default arena size in bytes (1 MiB).
pub const ARENA_DEFAULT_SIZE: usize = 1024 * 1024;

/// Default allocation alignment in bytes.
pub const ARENA_ALIGNMENT: usize = 8;

/// Handle to a range of bytes inside an [`Arena`].
///
/// A block stays valid until the arena it came from is reset. Using a block
/// after `reset` is not checked: the bytes are still readable but hold stale
/// data until the offset range is handed out again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaBlock {
    offset: usize,
    len: usize,
}

impl ArenaBlock {
    /// Creates a block handle from a raw offset and length.
    ///
    /// Intended for walking arena-internal data structures (e.g. linked
    /// lists that store the offset of the next node).
    #[inline]
    #[must_use]
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Byte offset of this block from the start of the arena.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> usize {
        self.offset
    }

    /// Length of this block in bytes.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.len
    }

    /// Whether the block is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Memory usage snapshot for an [`Arena`] or an arena pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Total capacity in bytes.
    pub total_size: usize,
    /// Bytes currently handed out.
    pub used_bytes: usize,
    /// Bytes still available.
    pub free_bytes: usize,
    /// Number of arenas contributing to this snapshot.
    pub arena_count: usize,
}

/// A bump-pointer arena allocator.
///
/// Allocations align the offset and advance it; nothing is ever freed
/// individually. [`Arena::reset`] rewinds the offset to zero, logically
/// invalidating every previously returned block while retaining (and not
/// wiping) the memory.
///
/// # Thread Safety
///
/// Not thread-safe. The simulation is single-threaded by design.
pub struct Arena {
    /// Word-aligned backing store; byte views are carved out of this.
    storage: Box<[u64]>,
    /// Exact byte capacity (may be less than `storage.len() * 8`).
    capacity: usize,
    /// Current allocation offset.
    used: usize,
}

impl Arena {
    /// Creates an owning arena with the given byte capacity.
    ///
    /// A zero size falls back to [`ARENA_DEFAULT_SIZE`]. The buffer is
    /// zero-initialized.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let capacity = if size == 0 { ARENA_DEFAULT_SIZE } else { size };
        let words = capacity.div_ceil(ARENA_ALIGNMENT);
        Self {
            storage: vec![0u64; words].into_boxed_slice(),
            capacity,
            used: 0,
        }
    }

    /// Creates an arena that adopts a caller-supplied buffer.
    ///
    /// The buffer's contents and length are taken over verbatim; Rust
    /// ownership replaces the explicit ownership flag of a borrowed-buffer
    /// arena, so the memory is released on drop either way.
    #[must_use]
    pub fn from_buffer(buffer: Vec<u8>) -> Self {
        let capacity = buffer.len();
        let words = capacity.div_ceil(ARENA_ALIGNMENT);
        let mut storage = vec![0u64; words].into_boxed_slice();
        bytemuck::cast_slice_mut::<u64, u8>(&mut storage)[..capacity].copy_from_slice(&buffer);
        Self {
            storage,
            capacity,
            used: 0,
        }
    }

    /// Returns the total capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current used space in bytes.
    #[inline]
    #[must_use]
    pub const fn used(&self) -> usize {
        self.used
    }

    /// Returns the remaining free space in bytes.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    /// Allocates `size` bytes at the default alignment.
    ///
    /// Returns `None` when `size` is zero or the arena is exhausted.
    #[inline]
    pub fn alloc(&mut self, size: usize) -> Option<ArenaBlock> {
        self.alloc_aligned(size, ARENA_ALIGNMENT)
    }

    /// Allocates `size` bytes aligned to `align` (a power of two, at most
    /// [`ARENA_ALIGNMENT`]).
    ///
    /// Returns `None` when `size` is zero or the remaining space cannot fit
    /// the aligned request. Callers are expected to treat `None` as "abort
    /// the enclosing operation", not as a fatal error.
    pub fn alloc_aligned(&mut self, size: usize, align: usize) -> Option<ArenaBlock> {
        if size == 0 {
            return None;
        }
        debug_assert!(align.is_power_of_two() && align <= ARENA_ALIGNMENT);

        let offset = align_up(self.used, align);
        let end = offset.checked_add(size)?;
        if end > self.capacity {
            return None;
        }

        self.used = end;
        Some(ArenaBlock { offset, len: size })
    }

    /// Read access to a block's bytes.
    ///
    /// # Panics
    ///
    /// Panics if the block range lies outside the arena capacity.
    #[inline]
    #[must_use]
    pub fn bytes(&self, block: ArenaBlock) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.storage)[block.offset..block.offset + block.len]
    }

    /// Write access to a block's bytes.
    ///
    /// # Panics
    ///
    /// Panics if the block range lies outside the arena capacity.
    #[inline]
    pub fn bytes_mut(&mut self, block: ArenaBlock) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<u64, u8>(&mut self.storage)
            [block.offset..block.offset + block.len]
    }

    /// Rewinds the allocation offset to zero.
    ///
    /// Memory is retained and not wiped: blocks handed out before the reset
    /// must no longer be used, but their bytes remain readable (stale) until
    /// the range is reallocated and overwritten.
    #[inline]
    pub fn reset(&mut self) {
        self.used = 0;
    }

    /// Saves the current offset for a scoped rewind.
    #[inline]
    #[must_use]
    pub const fn mark(&self) -> usize {
        self.used
    }

    /// Rewinds to an offset previously obtained from [`Arena::mark`].
    ///
    /// Blocks allocated after the mark become stale, exactly as with
    /// [`Arena::reset`].
    #[inline]
    pub fn rewind(&mut self, mark: usize) {
        debug_assert!(mark <= self.used);
        self.used = mark;
    }

    /// Returns a usage snapshot.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> ArenaStats {
        ArenaStats {
            total_size: self.capacity,
            used_bytes: self.used,
            free_bytes: self.capacity - self.used,
            arena_count: 1,
        }
    }
}

/// Rounds `value` up to the next multiple of `align` (a power of two).
#[inline]
#[must_use]
pub(crate) const fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}
