//! # Entity Management
//!
//! Entities are opaque 1-based ids. Ids are handed out monotonically and
//! permanently retired on destruction; a destroyed slot is never reissued.

/// Unique identifier for an entity.
///
/// Ids start at 1; the raw value 0 is reserved as the "no entity" sentinel
/// ([`EntityId::NULL`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Null/invalid entity id.
    pub const NULL: Self = Self(0);

    /// Creates an entity id from its raw value.
    ///
    /// Raw value 0 is the null sentinel; valid ids are produced by
    /// `World::create_entity`.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the id as a storage index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks whether this id is the null sentinel.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Per-slot entity bookkeeping.
///
/// One slot exists for every possible entity; slots are preallocated at
/// world creation and flipped inactive (mask cleared) on destruction.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntityInfo {
    /// Bitmask of attached component types (one bit per registered type).
    pub mask: u64,
    /// Whether this slot currently holds a live entity.
    pub active: bool,
}
