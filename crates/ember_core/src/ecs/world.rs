//! # ECS World
//!
//! The central store for entities and components. All component arrays are
//! carved out of the world's arena pool at registration time and live for
//! the lifetime of the world.

use std::mem;

use super::component::{Component, ComponentType};
use super::entity::{EntityId, EntityInfo};
use super::storage::ComponentArray;
use crate::error::CoreError;
use crate::memory::{ArenaPool, ArenaStats, ARENA_ALIGNMENT};

/// Maximum number of entities that can ever be created.
pub const MAX_ENTITIES: usize = 8192;

/// Structural cap on registered component types.
///
/// The component mask is 64 bits wide, but the registration table stops
/// well short of that.
pub const MAX_COMPONENT_TYPES: usize = 32;

/// The entity-component store.
///
/// Entity slots are preallocated; component arrays are dense, zero-filled
/// at registration, and indexed directly by entity id. Destroying an entity
/// only flips its slot inactive and clears its mask - the id is permanently
/// retired and never reissued.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = World::new();
/// let health = world.register_component::<Health>()?;
///
/// let entity = world.create_entity();
/// *world.add_component::<Health>(entity, health).unwrap() = Health::new(100.0);
/// ```
pub struct World {
    /// One slot per possible entity.
    entities: Box<[EntityInfo]>,
    /// Registration table of component arrays.
    components: Vec<ComponentArray>,
    /// Backing allocator for all component arrays.
    pool: ArenaPool,
    /// Next id to hand out (1-based; doubles as the exclusive scan bound).
    next_entity: u32,
}

impl World {
    /// Creates an empty world with all entity slots preallocated.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: vec![EntityInfo::default(); MAX_ENTITIES].into_boxed_slice(),
            components: Vec::with_capacity(MAX_COMPONENT_TYPES),
            pool: ArenaPool::new(),
            next_entity: 1,
        }
    }

    /// Creates a new entity.
    ///
    /// Returns [`EntityId::NULL`] once the fixed capacity is exhausted;
    /// the exhaustion is logged, not fatal. Ids are strictly increasing
    /// across all successful calls.
    pub fn create_entity(&mut self) -> EntityId {
        if self.next_entity as usize >= MAX_ENTITIES {
            tracing::warn!(capacity = MAX_ENTITIES, "entity capacity exhausted");
            return EntityId::NULL;
        }

        let id = EntityId::from_raw(self.next_entity);
        self.next_entity += 1;

        let slot = &mut self.entities[id.index()];
        slot.mask = 0;
        slot.active = true;

        id
    }

    /// Destroys an entity, permanently retiring its id.
    ///
    /// The slot is flagged inactive and its component mask cleared; the
    /// component bytes themselves are left in place. Destroying an inactive
    /// or out-of-range id is a no-op.
    pub fn destroy_entity(&mut self, entity: EntityId) {
        if !self.is_active(entity) {
            return;
        }
        let slot = &mut self.entities[entity.index()];
        slot.active = false;
        slot.mask = 0;
    }

    /// Checks whether an entity is currently active.
    #[inline]
    #[must_use]
    pub fn is_active(&self, entity: EntityId) -> bool {
        entity.index() < MAX_ENTITIES && self.entities[entity.index()].active
    }

    /// Exclusive upper bound of all ids issued so far.
    ///
    /// Iterating `1..next_entity_id()` visits every id ever created,
    /// including destroyed ones (which fail the [`World::is_active`] check).
    #[inline]
    #[must_use]
    pub const fn next_entity_id(&self) -> u32 {
        self.next_entity
    }

    /// Registers a component type of `C`'s size and layout.
    ///
    /// The dense backing array (entity capacity x element size) is allocated
    /// from the arena pool and zero-filled. Each call registers a fresh
    /// type: registering the same Rust type twice yields two independent
    /// arrays with distinct handles.
    ///
    /// # Errors
    ///
    /// Fails when the type cap is reached, the pool cannot satisfy the
    /// allocation, or `C` is zero-sized / over-aligned for arena storage.
    pub fn register_component<C: Component>(&mut self) -> Result<ComponentType, CoreError> {
        if self.components.len() >= MAX_COMPONENT_TYPES {
            tracing::warn!(limit = MAX_COMPONENT_TYPES, "component type cap exceeded");
            return Err(CoreError::ComponentLimitExceeded {
                limit: MAX_COMPONENT_TYPES,
            });
        }

        let size = mem::size_of::<C>();
        if size == 0 {
            return Err(CoreError::ZeroSizedComponent);
        }
        let align = mem::align_of::<C>();
        if align > ARENA_ALIGNMENT {
            return Err(CoreError::UnsupportedAlignment {
                align,
                limit: ARENA_ALIGNMENT,
            });
        }

        let requested = MAX_ENTITIES * size;
        let Some(block) = self.pool.alloc(requested) else {
            return Err(CoreError::StorageExhausted { requested });
        };
        self.pool.bytes_mut(block).fill(0);

        let ty = ComponentType::new(self.components.len() as u32);
        self.components.push(ComponentArray::new(block, size));
        Ok(ty)
    }

    /// Attaches a component to an entity and returns its storage slot.
    ///
    /// Sets the entity's mask bit for `ty`. The slot is returned as-is: zeroed
    /// on first use, but holding stale bytes if the component was previously
    /// removed from this entity (removal never wipes storage).
    ///
    /// Returns `None` for an inactive entity, an unregistered type, or a
    /// `C` whose size does not match the registered layout.
    pub fn add_component<C: Component>(
        &mut self,
        entity: EntityId,
        ty: ComponentType,
    ) -> Option<&mut C> {
        if !self.is_active(entity) {
            return None;
        }
        let array = *self.components.get(ty.index())?;
        if array.element_size() != mem::size_of::<C>() {
            return None;
        }

        self.entities[entity.index()].mask |= ty.bit();
        let bytes = &mut self.pool.bytes_mut(array.block())[array.slot_range(entity.index())];
        Some(bytemuck::from_bytes_mut(bytes))
    }

    /// Reads a component from an entity.
    ///
    /// Returns `None` when the entity is inactive or does not carry `ty`
    /// (the overwhelmingly common case during heterogeneous iteration -
    /// callers skip, they do not error).
    #[must_use]
    pub fn get_component<C: Component>(&self, entity: EntityId, ty: ComponentType) -> Option<&C> {
        if !self.has_component(entity, ty) {
            return None;
        }
        let array = self.components[ty.index()];
        if array.element_size() != mem::size_of::<C>() {
            return None;
        }
        let bytes = &self.pool.bytes(array.block())[array.slot_range(entity.index())];
        Some(bytemuck::from_bytes(bytes))
    }

    /// Mutable access to a component on an entity.
    pub fn get_component_mut<C: Component>(
        &mut self,
        entity: EntityId,
        ty: ComponentType,
    ) -> Option<&mut C> {
        if !self.has_component(entity, ty) {
            return None;
        }
        let array = self.components[ty.index()];
        if array.element_size() != mem::size_of::<C>() {
            return None;
        }
        let bytes = &mut self.pool.bytes_mut(array.block())[array.slot_range(entity.index())];
        Some(bytemuck::from_bytes_mut(bytes))
    }

    /// Checks whether an entity carries a component type.
    #[inline]
    #[must_use]
    pub fn has_component(&self, entity: EntityId, ty: ComponentType) -> bool {
        self.is_active(entity)
            && ty.index() < self.components.len()
            && (self.entities[entity.index()].mask & ty.bit()) != 0
    }

    /// Detaches a component from an entity.
    ///
    /// Only the mask bit is cleared - the slot bytes are deliberately left
    /// in place, so re-adding the component exposes the previous contents
    /// until overwritten. No-op for inactive entities or unregistered types.
    pub fn remove_component(&mut self, entity: EntityId, ty: ComponentType) {
        if !self.is_active(entity) || ty.index() >= self.components.len() {
            return;
        }
        self.entities[entity.index()].mask &= !ty.bit();
    }

    /// The component mask of an entity slot, if the id is in range.
    #[inline]
    #[must_use]
    pub fn component_mask(&self, entity: EntityId) -> Option<u64> {
        self.entities.get(entity.index()).map(|info| info.mask)
    }

    /// Iterates every active entity whose mask is a superset of `mask`.
    ///
    /// This is a linear scan over all issued ids; inactive slots are
    /// skipped, not compacted away.
    pub fn iter_with(&self, mask: u64) -> impl Iterator<Item = EntityId> + '_ {
        (1..self.next_entity)
            .map(EntityId::from_raw)
            .filter(move |id| {
                let info = &self.entities[id.index()];
                info.active && (info.mask & mask) == mask
            })
    }

    /// Collects matching entities into `out`, stopping when it is full.
    ///
    /// Returns the number of ids written.
    pub fn entities_with(&self, mask: u64, out: &mut [EntityId]) -> usize {
        let mut count = 0;
        for id in self.iter_with(mask) {
            if count >= out.len() {
                break;
            }
            out[count] = id;
            count += 1;
        }
        count
    }

    /// Usage snapshot of the component storage pool.
    #[must_use]
    pub fn storage_stats(&self) -> ArenaStats {
        self.pool.stats()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
