use log::{debug, warn};

use super::PhysicsWorld;
use crate::{
    collision::registry::{observer, SharedObserver},
    error::{EngineError, EngineResult},
    group::{
        Collection, CollectionKind, Container, Group, Listener, ListenerId, Node, SpatialIndex,
    },
    utils::allocator::{EntityId, GroupId},
};

impl PhysicsWorld {
    pub fn create_group(&mut self) -> GroupId {
        let id = self
            .groups
            .insert(Collection::new(CollectionKind::Group(Group::new())));
        debug!("group {:?} created", id);
        id
    }

    /// Creates a spatial index using the configured cell size.
    pub fn create_spatial_index(&mut self) -> GroupId {
        let cell_size = self.config().cell_size;
        self.insert_spatial_index(cell_size)
    }

    pub fn create_spatial_index_with_cell_size(&mut self, cell_size: f32) -> EngineResult<GroupId> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "cell_size must be positive, got {cell_size}"
            )));
        }
        Ok(self.insert_spatial_index(cell_size))
    }

    fn insert_spatial_index(&mut self, cell_size: f32) -> GroupId {
        let id = self.groups.insert(Collection::new(CollectionKind::Spatial(
            SpatialIndex::new(cell_size),
        )));
        debug!("spatial index {:?} created (cell size {})", id, cell_size);
        id
    }

    pub fn collection(&self, group: GroupId) -> Option<&Collection> {
        self.groups.get(group)
    }

    pub fn try_collection(&self, group: GroupId) -> EngineResult<&Collection> {
        self.groups.get(group).ok_or(EngineError::UnknownGroup(group))
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Adds `member` to `group` and notifies the group's listeners.
    ///
    /// Returns `false` without side effects when either side is dead, the
    /// member is already present, a group would contain itself, or a group
    /// is added to a spatial index.
    pub fn add(&mut self, group: GroupId, member: impl Into<Node>) -> bool {
        let member = member.into();
        let Some(collection) = self.groups.get(group) else {
            return false;
        };

        let bounds = match member {
            Node::Entity(entity) => match self.entities.get(entity) {
                Some(entity) => Some(entity.aabb()),
                None => return false,
            },
            Node::Group(nested) => {
                if !self.groups.contains(nested) {
                    return false;
                }
                if collection.is_spatial() {
                    warn!("group {:?} cannot be indexed by spatial index {:?}", nested, group);
                    return false;
                }
                if self.reaches(nested, group) {
                    warn!("adding group {:?} to {:?} would create a cycle", nested, group);
                    return false;
                }
                None
            }
        };

        let Some(collection) = self.groups.get_mut(group) else {
            return false;
        };
        if !collection.insert(member, bounds) {
            return false;
        }
        let listeners = collection.listeners.snapshot();
        self.link_owner(member, group);
        debug!("{:?} added to group {:?}", member, group);

        for listener in listeners {
            match listener {
                Listener::Collider { target, callback } => {
                    self.register_collider_shared(member, target, callback);
                }
                Listener::Observer(observer) => self.notify_observer(&observer, member),
            }
        }
        true
    }

    /// Removes `member` from `group`. Removing a non-member is a no-op.
    pub fn remove(&mut self, group: GroupId, member: impl Into<Node>) -> bool {
        let member = member.into();
        let removed = self
            .groups
            .get_mut(group)
            .is_some_and(|collection| collection.remove(member));
        if removed {
            self.unlink_owner(member, group);
        }
        removed
    }

    /// Empties `group`; listeners stay installed.
    pub fn clear(&mut self, group: GroupId) {
        let Some(collection) = self.groups.get_mut(group) else {
            return;
        };
        for member in collection.clear() {
            self.unlink_owner(member, group);
        }
    }

    /// Empties `group`, detaches it from every group holding it and frees it.
    pub fn destroy_group(&mut self, group: GroupId) -> bool {
        if !self.groups.contains(group) {
            return false;
        }
        self.clear(group);
        let owners: Vec<GroupId> = self
            .groups
            .get(group)
            .map(|collection| collection.owners().collect())
            .unwrap_or_default();
        for owner in owners {
            if let Some(collection) = self.groups.get_mut(owner) {
                collection.remove(Node::Group(group));
            }
        }
        self.groups.remove(group);
        debug!("group {:?} destroyed", group);
        true
    }

    /// Removes the entity from every collection holding it and frees it.
    pub fn destroy(&mut self, entity: EntityId) -> bool {
        let Some(removed) = self.entities.remove(entity) else {
            return false;
        };
        for group in removed.groups() {
            if let Some(collection) = self.groups.get_mut(group) {
                collection.remove(Node::Entity(entity));
            }
        }
        self.physics.registry.purge_entity(entity);
        debug!("entity {:?} destroyed", entity);
        true
    }

    /// Registers a listener invoked with every member added to `group` from
    /// now on. Returns `None` when the group does not exist.
    pub fn observe<F>(&mut self, group: GroupId, f: F) -> Option<ListenerId>
    where
        F: FnMut(&mut PhysicsWorld, Node) + Send + 'static,
    {
        let collection = self.groups.get_mut(group)?;
        Some(collection.listeners.push(Listener::Observer(observer(f))))
    }

    pub fn unobserve(&mut self, group: GroupId, listener: ListenerId) -> bool {
        self.groups
            .get_mut(group)
            .is_some_and(|collection| collection.listeners.remove(listener))
    }

    /// Re-registers an indexed entity at its current bounds.
    ///
    /// Spatial indexes keep the cells an entity covered when it was added;
    /// call this after moving an entity that lives in one.
    pub fn reindex(&mut self, group: GroupId, entity: EntityId) -> bool {
        let Some(bounds) = self.entities.get(entity).map(|entity| entity.aabb()) else {
            return false;
        };
        let Some(collection) = self.groups.get_mut(group) else {
            return false;
        };
        if !collection.is_spatial() || !collection.remove(Node::Entity(entity)) {
            return false;
        }
        collection.insert(Node::Entity(entity), Some(bounds))
    }

    fn notify_observer(&mut self, observer: &SharedObserver, member: Node) {
        match observer.try_lock() {
            Some(mut notify) => (&mut *notify)(self, member),
            None => warn!("skipping re-entrant observer for {:?}", member),
        }
    }

    fn link_owner(&mut self, member: Node, group: GroupId) {
        match member {
            Node::Entity(id) => {
                if let Some(entity) = self.entities.get_mut(id) {
                    entity.groups.insert(group);
                }
            }
            Node::Group(id) => {
                if let Some(collection) = self.groups.get_mut(id) {
                    collection.owners.insert(group);
                }
            }
        }
    }

    fn unlink_owner(&mut self, member: Node, group: GroupId) {
        match member {
            Node::Entity(id) => {
                if let Some(entity) = self.entities.get_mut(id) {
                    entity.groups.remove(&group);
                }
            }
            Node::Group(id) => {
                if let Some(collection) = self.groups.get_mut(id) {
                    collection.owners.remove(&group);
                }
            }
        }
    }

    /// Whether `target` is `from` or nested somewhere inside it.
    fn reaches(&self, from: GroupId, target: GroupId) -> bool {
        let mut pending = vec![from];
        while let Some(current) = pending.pop() {
            if current == target {
                return true;
            }
            if let Some(collection) = self.groups.get(current) {
                pending.extend(collection.direct_members().into_iter().filter_map(|node| match node {
                    Node::Group(nested) => Some(nested),
                    Node::Entity(_) => None,
                }));
            }
        }
        false
    }
}
