//! # Component Types
//!
//! Components are pure data: `Pod` structs with a fixed size, stored in
//! type-erased dense arrays. A [`ComponentType`] handle is returned at
//! registration time and identifies the type (and its mask bit) from then on.

use bytemuck::Pod;

/// Marker trait for ECS components.
///
/// Components must be plain old data so they can live in zero-initialized,
/// type-erased byte arrays:
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Health { current: f32, max: f32 }
/// ```
pub trait Component: Pod {}

impl<T: Pod> Component for T {}

/// Handle for a registered component type.
///
/// At most 64 types can exist (mask width); a lower structural cap is
/// enforced at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ComponentType(u32);

impl ComponentType {
    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Index of this type into the registration table.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The mask bit corresponding to this type.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u64 {
        1u64 << self.0
    }
}
