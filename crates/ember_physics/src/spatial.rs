//! # Spatial Hash Grid
//!
//! Uniform grid broad phase: entities are bucketed into world-space cells so
//! pairwise narrow-phase tests only run against nearby candidates, turning
//! the O(n^2) sweep into roughly O(n*k).
//!
//! The cell array is allocated once and lives as long as the grid - cell
//! topology is stable across a session. The per-cell entity lists are
//! singly linked nodes carved out of a frame arena and are never freed
//! individually: the whole arena is reset before each rebuild.

use bytemuck::{Pod, Zeroable};

use ember_core::{Arena, ArenaBlock, EntityId, Vec3};

/// List terminator / empty-cell marker (an offset no arena can reach).
const NIL: u32 = u32::MAX;

/// One linked-list node in a cell's entity list.
///
/// `next` stores the byte offset of the next node within the frame arena.
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C)]
struct EntityNode {
    entity: u32,
    next: u32,
}

const NODE_SIZE: usize = std::mem::size_of::<EntityNode>();

/// Uniform spatial hash grid over a rectangle of world space.
pub struct SpatialGrid {
    /// Head node offset per cell; [`NIL`] when empty.
    cells: Box<[u32]>,
    /// Cell count along x.
    width: i32,
    /// Cell count along y.
    height: i32,
    /// Edge length of a cell in world units.
    cell_size: f32,
    /// World-space position of cell (0, 0).
    origin: Vec3,
}

impl SpatialGrid {
    /// Creates a grid covering `width` x `height` world units from `origin`.
    ///
    /// Cell counts are `dimension / cell_size + 1` so the covered span
    /// always reaches past the far edge.
    #[must_use]
    pub fn new(origin: Vec3, width: f32, height: f32, cell_size: f32) -> Self {
        let cells_x = (width / cell_size) as i32 + 1;
        let cells_y = (height / cell_size) as i32 + 1;
        let total = (cells_x * cells_y) as usize;
        tracing::info!(cells_x, cells_y, total, "spatial grid initialized");

        Self {
            cells: vec![NIL; total].into_boxed_slice(),
            width: cells_x,
            height: cells_y,
            cell_size,
            origin,
        }
    }

    /// Cell count along x.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Cell count along y.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Empties every cell. O(cells); called once per rebuild, before the
    /// frame arena backing the node lists is reused.
    pub fn clear(&mut self) {
        self.cells.fill(NIL);
    }

    /// Flat index of the cell at grid coordinates, or `None` out of range.
    fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    /// Grid coordinates of a world-space position.
    fn cell_coords(&self, position: Vec3) -> (i32, i32) {
        (
            ((position.x - self.origin.x) / self.cell_size) as i32,
            ((position.y - self.origin.y) / self.cell_size) as i32,
        )
    }

    /// Inclusive cell range covered by a circle's bounding box.
    fn cell_range(&self, position: Vec3, radius: f32) -> (i32, i32, i32, i32) {
        let (min_x, min_y) =
            self.cell_coords(Vec3::new(position.x - radius, position.y - radius, 0.0));
        let (max_x, max_y) =
            self.cell_coords(Vec3::new(position.x + radius, position.y + radius, 0.0));
        (min_x, min_y, max_x, max_y)
    }

    /// Inserts an entity into every cell its bounding box covers.
    ///
    /// Nodes are allocated from `arena` and prepended to each covered
    /// cell's list; an entity spanning several cells is referenced from all
    /// of them. Arena exhaustion is logged and aborts the remaining
    /// insertions for this call - the frame degrades, it does not crash.
    pub fn insert(&mut self, arena: &mut Arena, entity: EntityId, position: Vec3, radius: f32) {
        let (min_x, min_y, max_x, max_y) = self.cell_range(position, radius);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let Some(cell) = self.cell_index(x, y) else {
                    continue;
                };
                let Some(block) = arena.alloc(NODE_SIZE) else {
                    tracing::error!(
                        entity = entity.raw(),
                        used = arena.used(),
                        capacity = arena.capacity(),
                        "spatial arena exhausted, dropping remaining insertions"
                    );
                    return;
                };

                let node = EntityNode {
                    entity: entity.raw(),
                    next: self.cells[cell],
                };
                arena
                    .bytes_mut(block)
                    .copy_from_slice(bytemuck::bytes_of(&node));
                self.cells[cell] = block.offset() as u32;
            }
        }
    }

    /// Collects distinct entities near a circle into `out`.
    ///
    /// Walks the same cell range as [`SpatialGrid::insert`], skipping the
    /// query entity itself and deduplicating by linear scan against the
    /// accumulator. `out` is cleared first and never grown beyond its
    /// existing capacity: overflow silently truncates the candidate set.
    pub fn potential_collisions(
        &self,
        arena: &Arena,
        entity: EntityId,
        position: Vec3,
        radius: f32,
        out: &mut Vec<EntityId>,
    ) {
        out.clear();
        let capacity = out.capacity();
        let (min_x, min_y, max_x, max_y) = self.cell_range(position, radius);

        'cells: for y in min_y..=max_y {
            for x in min_x..=max_x {
                let Some(cell) = self.cell_index(x, y) else {
                    continue;
                };

                let mut cursor = self.cells[cell];
                while cursor != NIL {
                    if out.len() >= capacity {
                        break 'cells;
                    }
                    let node: EntityNode = bytemuck::pod_read_unaligned(
                        arena.bytes(ArenaBlock::new(cursor as usize, NODE_SIZE)),
                    );
                    let candidate = EntityId::from_raw(node.entity);
                    if candidate != entity && !out.contains(&candidate) {
                        out.push(candidate);
                    }
                    cursor = node.next;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_and_arena() -> (SpatialGrid, Arena) {
        // 10x10 cells of 10 units starting at the origin.
        (
            SpatialGrid::new(Vec3::ZERO, 90.0, 90.0, 10.0),
            Arena::new(64 * 1024),
        )
    }

    fn query(grid: &SpatialGrid, arena: &Arena, from: Vec3) -> Vec<EntityId> {
        let mut out = Vec::with_capacity(64);
        grid.potential_collisions(arena, EntityId::from_raw(999), from, 1.0, &mut out);
        out
    }

    #[test]
    fn test_entity_spanning_four_cells_is_visible_from_each() {
        let (mut grid, mut arena) = grid_and_arena();
        let entity = EntityId::from_raw(1);

        // Centered on the corner shared by cells (0,0), (1,0), (0,1), (1,1).
        grid.insert(&mut arena, entity, Vec3::new(10.0, 10.0, 0.0), 3.0);

        for corner in [
            Vec3::new(5.0, 5.0, 0.0),
            Vec3::new(15.0, 5.0, 0.0),
            Vec3::new(5.0, 15.0, 0.0),
            Vec3::new(15.0, 15.0, 0.0),
        ] {
            assert_eq!(query(&grid, &arena, corner), vec![entity]);
        }

        // A disjoint cell two columns over sees nothing.
        assert!(query(&grid, &arena, Vec3::new(45.0, 45.0, 0.0)).is_empty());
    }

    #[test]
    fn test_candidates_are_deduplicated() {
        let (mut grid, mut arena) = grid_and_arena();
        let entity = EntityId::from_raw(1);
        grid.insert(&mut arena, entity, Vec3::new(10.0, 10.0, 0.0), 4.0);

        // Query box overlaps all four cells holding the entity.
        let mut out = Vec::with_capacity(64);
        grid.potential_collisions(
            &arena,
            EntityId::from_raw(2),
            Vec3::new(10.0, 10.0, 0.0),
            4.0,
            &mut out,
        );
        assert_eq!(out, vec![entity]);
    }

    #[test]
    fn test_query_excludes_self() {
        let (mut grid, mut arena) = grid_and_arena();
        let entity = EntityId::from_raw(7);
        grid.insert(&mut arena, entity, Vec3::new(25.0, 25.0, 0.0), 2.0);

        let mut out = Vec::with_capacity(8);
        grid.potential_collisions(&arena, entity, Vec3::new(25.0, 25.0, 0.0), 2.0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_candidate_buffer_truncates_silently() {
        let (mut grid, mut arena) = grid_and_arena();
        for raw in 1..=8 {
            grid.insert(
                &mut arena,
                EntityId::from_raw(raw),
                Vec3::new(25.0, 25.0, 0.0),
                1.0,
            );
        }

        let mut out = Vec::with_capacity(3);
        grid.potential_collisions(
            &arena,
            EntityId::from_raw(999),
            Vec3::new(25.0, 25.0, 0.0),
            1.0,
            &mut out,
        );
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_out_of_bounds_positions_are_skipped() {
        let (mut grid, mut arena) = grid_and_arena();
        // Far outside the grid on both axes; nothing to insert into.
        grid.insert(
            &mut arena,
            EntityId::from_raw(1),
            Vec3::new(-500.0, -500.0, 0.0),
            2.0,
        );
        assert_eq!(arena.used(), 0);

        let mut out = Vec::with_capacity(8);
        grid.potential_collisions(
            &arena,
            EntityId::from_raw(2),
            Vec3::new(-500.0, -500.0, 0.0),
            2.0,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_clear_empties_cells_after_arena_reset() {
        let (mut grid, mut arena) = grid_and_arena();
        grid.insert(&mut arena, EntityId::from_raw(1), Vec3::new(25.0, 25.0, 0.0), 2.0);

        arena.reset();
        grid.clear();

        assert!(query(&grid, &arena, Vec3::new(25.0, 25.0, 0.0)).is_empty());
    }
}
