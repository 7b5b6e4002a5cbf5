use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use super::{plain::Group, Container, Node};
use crate::core::types::Aabb;
use crate::utils::allocator::EntityId;

/// Placements above this many cells are reported; they are still indexed.
pub const LARGE_PLACEMENT_CELLS: usize = 4096;

/// Inclusive rectangle of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellBounds {
    pub min: (i32, i32),
    pub max: (i32, i32),
}

impl CellBounds {
    pub fn contains(&self, cell: (i32, i32)) -> bool {
        (self.min.0..=self.max.0).contains(&cell.0) && (self.min.1..=self.max.1).contains(&cell.1)
    }

    /// Number of cells covered; saturates instead of overflowing.
    pub fn cell_count(&self) -> usize {
        let span = |min: i32, max: i32| {
            let cells = (i64::from(max) - i64::from(min) + 1).max(0);
            usize::try_from(cells).unwrap_or(usize::MAX)
        };
        span(self.min.0, self.max.0).saturating_mul(span(self.min.1, self.max.1))
    }

    pub fn cells(&self) -> CellIter {
        CellIter {
            bounds: *self,
            next: Some(self.min),
        }
    }
}

/// Row-major walk over the cells of a [`CellBounds`].
#[derive(Debug, Clone)]
pub struct CellIter {
    bounds: CellBounds,
    next: Option<(i32, i32)>,
}

impl Iterator for CellIter {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        let (x, y) = self.next?;
        if x > self.bounds.max.0 || y > self.bounds.max.1 {
            self.next = None;
            return None;
        }
        self.next = if y < self.bounds.max.1 {
            Some((x, y + 1))
        } else if x < self.bounds.max.0 {
            Some((x + 1, self.bounds.min.1))
        } else {
            None
        };
        Some((x, y))
    }
}

/// Uniform grid spatial partitioning: every cell owns a [`Group`] of the
/// entities whose bounding box overlaps it.
///
/// Entities are indexed at the position they had when added; call
/// [`PhysicsWorld::reindex`](crate::PhysicsWorld::reindex) after moving one.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f32,
    cells: HashMap<(i32, i32), Group>,
    placements: HashMap<EntityId, CellBounds>,
    order: Vec<EntityId>,
}

impl SpatialIndex {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            placements: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn world_to_grid(&self, value: f32) -> i32 {
        (value / self.cell_size).floor() as i32
    }

    pub fn bounds_for(&self, aabb: &Aabb) -> CellBounds {
        CellBounds {
            min: (self.world_to_grid(aabb.min.x), self.world_to_grid(aabb.min.y)),
            max: (self.world_to_grid(aabb.max.x), self.world_to_grid(aabb.max.y)),
        }
    }

    pub fn cell(&self, cell: (i32, i32)) -> Option<&Group> {
        self.cells.get(&cell)
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Cells the entity was registered into.
    pub fn placement(&self, entity: EntityId) -> Option<CellBounds> {
        self.placements.get(&entity).copied()
    }

    /// Indexed entities in insertion order, each listed once.
    pub fn entities(&self) -> &[EntityId] {
        &self.order
    }
}

impl Container for SpatialIndex {
    /// Only entities with known bounds can be indexed.
    fn insert(&mut self, node: Node, bounds: Option<Aabb>) -> bool {
        let (Node::Entity(entity), Some(aabb)) = (node, bounds) else {
            return false;
        };
        if self.placements.contains_key(&entity) {
            return false;
        }

        let cells = self.bounds_for(&aabb);
        let covered = cells.cell_count();
        if covered > LARGE_PLACEMENT_CELLS {
            warn!(
                "{:?} covers {} cells of spatial index (cell size {})",
                entity, covered, self.cell_size
            );
        }
        for cell in cells.cells() {
            self.cells.entry(cell).or_default().insert(node, None);
        }
        self.placements.insert(entity, cells);
        self.order.push(entity);
        true
    }

    fn remove(&mut self, node: Node) -> bool {
        let Node::Entity(entity) = node else {
            return false;
        };
        let Some(cells) = self.placements.remove(&entity) else {
            return false;
        };

        for cell in cells.cells() {
            if let Some(group) = self.cells.get_mut(&cell) {
                group.remove(node);
                if group.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
        self.order.retain(|id| *id != entity);
        true
    }

    fn clear(&mut self) -> Vec<Node> {
        self.cells.clear();
        self.placements.clear();
        std::mem::take(&mut self.order)
            .into_iter()
            .map(Node::Entity)
            .collect()
    }

    fn contains(&self, node: Node) -> bool {
        match node {
            Node::Entity(entity) => self.placements.contains_key(&entity),
            Node::Group(_) => false,
        }
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}
