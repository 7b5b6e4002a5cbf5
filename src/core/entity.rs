use std::collections::BTreeSet;

use glam::Vec2;

use super::types::{Aabb, Touching};
use crate::error::{EngineError, EngineResult};
use crate::utils::allocator::{EntityId, GroupId};

/// A moving or static rectangle.
///
/// Geometry is read freely by the host; contact state is only written by
/// collision resolution inside [`PhysicsWorld::update_entity`](crate::PhysicsWorld::update_entity).
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub pushable: bool,
    size: Vec2,
    touching: Touching,
    pub(crate) groups: BTreeSet<GroupId>,
    pub(crate) last_frame: Option<u64>,
}

impl Entity {
    pub fn new(position: Vec2, size: Vec2) -> EngineResult<Self> {
        Self::builder().position(position.x, position.y).size(size.x, size.y).build()
    }

    pub fn builder() -> EntityBuilder {
        EntityBuilder::new()
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }

    pub fn center_x(&self) -> f32 {
        self.position.x + self.size.x / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.position.y + self.size.y / 2.0
    }

    pub fn min_x(&self) -> f32 {
        self.position.x
    }

    pub fn min_y(&self) -> f32 {
        self.position.y
    }

    pub fn max_x(&self) -> f32 {
        self.position.x + self.size.x
    }

    pub fn max_y(&self) -> f32 {
        self.position.y + self.size.y
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_position_size(self.position, self.size)
    }

    pub fn touching(&self) -> &Touching {
        &self.touching
    }

    pub(crate) fn touching_mut(&mut self) -> &mut Touching {
        &mut self.touching
    }

    /// Groups that currently hold this entity.
    pub fn groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.groups.iter().copied()
    }

    pub fn set_position(&mut self, x: f32, y: f32) -> &mut Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn set_center(&mut self, x: f32, y: f32) -> &mut Self {
        self.position = Vec2::new(x, y) - self.size / 2.0;
        self
    }

    pub fn set_size(&mut self, width: f32, height: f32) -> EngineResult<&mut Self> {
        self.size = validate_size(width, height)?;
        Ok(self)
    }

    pub fn set_velocity(&mut self, x: f32, y: f32) -> &mut Self {
        self.velocity = Vec2::new(x, y);
        self
    }

    pub fn set_pushable(&mut self, pushable: bool) -> &mut Self {
        self.pushable = pushable;
        self
    }

    /// Adds `(dx, dy)` directly to the velocity.
    pub fn apply_force(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.velocity += Vec2::new(dx, dy);
        self
    }

    /// Scales the velocity by `(1 - fx, 1 - fy)`.
    pub fn apply_friction(&mut self, fx: f32, fy: f32) -> &mut Self {
        self.velocity *= Vec2::new(1.0 - fx, 1.0 - fy);
        self
    }
}

fn validate_size(width: f32, height: f32) -> EngineResult<Vec2> {
    let valid = |value: f32| value.is_finite() && value > 0.0;
    if valid(width) && valid(height) {
        Ok(Vec2::new(width, height))
    } else {
        Err(EngineError::InvalidSize { width, height })
    }
}

fn validate_finite(field: &'static str, value: Vec2) -> EngineResult<Vec2> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::NonFinite {
            field,
            x: value.x,
            y: value.y,
        })
    }
}

pub struct EntityBuilder {
    position: Vec2,
    size: Vec2,
    velocity: Vec2,
    pushable: bool,
}

impl Default for EntityBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityBuilder {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pushable: false,
        }
    }

    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = Vec2::new(width, height);
        self
    }

    pub fn velocity(mut self, x: f32, y: f32) -> Self {
        self.velocity = Vec2::new(x, y);
        self
    }

    pub fn pushable(mut self, pushable: bool) -> Self {
        self.pushable = pushable;
        self
    }

    /// Fails when the size is not strictly positive or any vector is not finite.
    pub fn build(self) -> EngineResult<Entity> {
        Ok(Entity {
            id: EntityId::default(),
            position: validate_finite("position", self.position)?,
            velocity: validate_finite("velocity", self.velocity)?,
            pushable: self.pushable,
            size: validate_size(self.size.x, self.size.y)?,
            touching: Touching::default(),
            groups: BTreeSet::new(),
            last_frame: None,
        })
    }
}
