mod frame;
mod groups;
mod physics;

use log::debug;

use crate::{
    collision::engine::PhysicsEngine,
    config::PhysicsConfig,
    core::{
        entity::{Entity, EntityBuilder},
        types::Aabb,
    },
    dynamics::{FrameClock, Integrator},
    error::{EngineError, EngineResult},
    group::{Collection, Members, Node},
    utils::allocator::{Arena, EntityId, GroupId},
};

/// Central container owning every entity and collection, the collision
/// registry, and the frame clock.
pub struct PhysicsWorld {
    entities: Arena<Entity>,
    groups: Arena<Collection, GroupId>,
    physics: PhysicsEngine,
    integrator: Integrator,
    clock: FrameClock,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::from_config(PhysicsConfig::default())
    }

    /// Builds a world after validating `config`.
    pub fn with_config(config: PhysicsConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: PhysicsConfig) -> Self {
        Self {
            entities: Arena::new(),
            groups: Arena::new(),
            integrator: Integrator::new(config.max_delta_time),
            clock: FrameClock::new(config.max_delta_time),
            physics: PhysicsEngine::new(config),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        self.physics.config()
    }

    pub fn physics(&self) -> &PhysicsEngine {
        &self.physics
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Stores an entity and returns its handle.
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        let id = self.entities.insert_with(|id| {
            entity.id = id;
            entity
        });
        debug!("entity {:?} created", id);
        id
    }

    pub fn spawn(&mut self, builder: EntityBuilder) -> EngineResult<EntityId> {
        Ok(self.add_entity(builder.build()?))
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn try_entity(&self, id: EntityId) -> EngineResult<&Entity> {
        self.entities.get(id).ok_or(EngineError::UnknownEntity(id))
    }

    pub fn try_entity_mut(&mut self, id: EntityId) -> EngineResult<&mut Entity> {
        self.entities.get_mut(id).ok_or(EngineError::UnknownEntity(id))
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities.iter()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_alive(&self, node: Node) -> bool {
        match node {
            Node::Entity(id) => self.entities.contains(id),
            Node::Group(id) => self.groups.contains(id),
        }
    }

    /// Lazily walks the entities reachable from `node`.
    ///
    /// A query box restricts spatial indexes to the cells it covers and is
    /// ignored by plain groups.
    pub fn members(&self, node: impl Into<Node>, query: Option<Aabb>) -> Members<'_> {
        Members::new(&self.groups, node.into(), query)
    }

    /// Visits every entity reachable from `node`, see [`members`](Self::members).
    pub fn iterate<F>(&self, node: impl Into<Node>, query: Option<Aabb>, mut visit: F)
    where
        F: FnMut(&Entity),
    {
        for id in self.members(node, query) {
            if let Some(entity) = self.entities.get(id) {
                visit(entity);
            }
        }
    }
}
