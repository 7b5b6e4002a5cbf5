use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::utils::allocator::EntityId;

/// Axis-aligned bounding box `[min.x, max.x] × [min.y, max.y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self {
            min: position,
            max: position + size,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size() / 2.0
    }

    /// Strict overlap: boxes that share only an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let delta = (self.center() - other.center()).abs();
        let reach = (self.size() + other.size()) / 2.0;
        delta.x < reach.x && delta.y < reach.y
    }
}

/// One side of an entity's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Up,
    Down,
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Up => Side::Down,
            Side::Down => Side::Up,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Per-side contact state, filled in by collision resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touching {
    pub up: Option<EntityId>,
    pub down: Option<EntityId>,
    pub left: Option<EntityId>,
    pub right: Option<EntityId>,
}

impl Touching {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn get(&self, side: Side) -> Option<EntityId> {
        match side {
            Side::Up => self.up,
            Side::Down => self.down,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set(&mut self, side: Side, other: EntityId) {
        let slot = match side {
            Side::Up => &mut self.up,
            Side::Down => &mut self.down,
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *slot = Some(other);
    }

    pub fn any(&self) -> bool {
        self.up.is_some() || self.down.is_some() || self.left.is_some() || self.right.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_contact_is_not_an_intersection() {
        let a = Aabb::from_position_size(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_position_size(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let c = Aabb::from_position_size(Vec2::new(9.5, 9.5), Vec2::splat(10.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn touching_set_and_clear() {
        let mut touching = Touching::default();
        let other = EntityId::from_index(3);
        touching.set(Side::Left, other);
        assert_eq!(touching.get(Side::Left), Some(other));
        assert_eq!(touching.get(Side::Left.opposite()), None);
        assert!(touching.any());
        touching.clear();
        assert!(!touching.any());
    }
}
