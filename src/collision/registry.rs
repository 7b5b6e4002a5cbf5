use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::group::Node;
use crate::utils::allocator::EntityId;
use crate::world::PhysicsWorld;

/// Called with `(mover, other)` after a collision is resolved, or with the
/// intersecting pair when an overlap registration fires.
pub type CollisionFn = dyn FnMut(&mut PhysicsWorld, EntityId, EntityId) + Send;

/// Called with the member that was just added to an observed collection.
pub type ObserverFn = dyn FnMut(&mut PhysicsWorld, Node) + Send;

/// A callback shared by every registration created from one call.
pub type SharedCallback = Arc<Mutex<CollisionFn>>;
pub type SharedObserver = Arc<Mutex<ObserverFn>>;

pub fn callback<F>(f: F) -> SharedCallback
where
    F: FnMut(&mut PhysicsWorld, EntityId, EntityId) + Send + 'static,
{
    Arc::new(Mutex::new(f))
}

pub fn observer<F>(f: F) -> SharedObserver
where
    F: FnMut(&mut PhysicsWorld, Node) + Send + 'static,
{
    Arc::new(Mutex::new(f))
}

/// Collision registration of a single moving entity.
pub struct Collider {
    callback: SharedCallback,
    targets: Vec<Node>,
}

impl Collider {
    fn new(callback: SharedCallback) -> Self {
        Self {
            callback,
            targets: Vec::new(),
        }
    }

    pub fn callback(&self) -> &SharedCallback {
        &self.callback
    }

    pub fn targets(&self) -> &[Node] {
        &self.targets
    }
}

/// Standing overlap subscription between two nodes.
pub struct OverlapPair {
    pub a: Node,
    pub b: Node,
    pub(crate) callback: SharedCallback,
}

#[derive(Default)]
pub struct ColliderRegistry {
    colliders: HashMap<EntityId, Collider>,
    overlaps: Vec<OverlapPair>,
}

impl ColliderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `target` to the mover's target set. The first registration of a
    /// mover fixes its callback; later ones only add targets.
    pub fn register_target(&mut self, mover: EntityId, target: Node, callback: &SharedCallback) -> bool {
        let collider = self
            .colliders
            .entry(mover)
            .or_insert_with(|| Collider::new(Arc::clone(callback)));
        if collider.targets.contains(&target) {
            return false;
        }
        collider.targets.push(target);
        true
    }

    pub fn collider(&self, mover: EntityId) -> Option<&Collider> {
        self.colliders.get(&mover)
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Duplicate pairs are kept; each registration fires on its own.
    pub fn add_overlap(&mut self, a: Node, b: Node, callback: SharedCallback) -> usize {
        self.overlaps.push(OverlapPair { a, b, callback });
        self.overlaps.len() - 1
    }

    pub fn overlaps(&self) -> &[OverlapPair] {
        &self.overlaps
    }

    /// Drops the entity's own registration and every place it is used as a
    /// direct target or overlap side.
    pub fn purge_entity(&mut self, entity: EntityId) {
        self.colliders.remove(&entity);
        let node = Node::Entity(entity);
        for collider in self.colliders.values_mut() {
            collider.targets.retain(|target| *target != node);
        }
        self.overlaps.retain(|pair| pair.a != node && pair.b != node);
    }
}
