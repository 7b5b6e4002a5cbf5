use log::{debug, trace, warn};

use super::PhysicsWorld;
use crate::{
    collision::{
        narrowphase::Resolution,
        registry::{callback, SharedCallback},
    },
    group::{Listener, Node},
    utils::{allocator::EntityId, logging::ScopedTimer},
};

impl PhysicsWorld {
    /// Integrates one entity and resolves it against its registered colliders.
    ///
    /// Contact state is cleared first, so after this call every `touching`
    /// side was set by a collision resolved here. Returns `false` for a dead
    /// handle.
    pub fn update_entity(&mut self, id: EntityId, dt: f32) -> bool {
        let frame = self.clock.frame();
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        entity.touching_mut().clear();
        entity.last_frame = Some(frame);
        self.integrator.integrate_position(entity, dt);
        self.process_collisions(id);
        true
    }

    /// Resolves `id` against every candidate reachable through its collider
    /// registration and fires the registration's callback per resolved pair.
    /// Returns the number of resolved collisions.
    pub fn process_collisions(&mut self, id: EntityId) -> usize {
        let Some(collider) = self.physics.registry.collider(id) else {
            return 0;
        };
        let Some(query) = self.entities.get(id).map(|entity| entity.aabb()) else {
            return 0;
        };
        let callback = collider.callback().clone();
        let candidates: Vec<EntityId> = collider
            .targets()
            .iter()
            .flat_map(|target| self.members(*target, Some(query)))
            .collect();

        let mut resolved = 0;
        for candidate in candidates {
            if let Some(resolution) = self.collide(id, candidate) {
                trace!(
                    "{:?} pushed {:?} against {:?}",
                    resolution.moved,
                    resolution.side,
                    resolution.against
                );
                resolved += 1;
                self.dispatch(&callback, id, candidate);
            }
        }
        resolved
    }

    /// Resolves a single pair, see [`PhysicsEngine::collide`](crate::PhysicsEngine::collide).
    pub fn collide(&mut self, a: EntityId, b: EntityId) -> Option<Resolution> {
        let (entity_a, entity_b) = self.entities.get2_mut(a, b)?;
        self.physics.collide(entity_a, entity_b)
    }

    /// Makes `mover` collide with `target`.
    ///
    /// A group mover registers each of its entities, now and as they are
    /// added later. A group target stays live: entities added to it later
    /// are collided with too. Only the first registration of an entity sets
    /// its callback.
    pub fn register_collider<F>(&mut self, mover: impl Into<Node>, target: impl Into<Node>, on_collide: F)
    where
        F: FnMut(&mut PhysicsWorld, EntityId, EntityId) + Send + 'static,
    {
        self.register_collider_shared(mover.into(), target.into(), callback(on_collide));
    }

    pub(crate) fn register_collider_shared(&mut self, mover: Node, target: Node, on_collide: SharedCallback) {
        match mover {
            Node::Entity(entity) => {
                if !self.entities.contains(entity) {
                    return;
                }
                if self.physics.registry.register_target(entity, target, &on_collide) {
                    debug!("collider {:?} -> {:?}", entity, target);
                }
            }
            Node::Group(group) => {
                let Some(collection) = self.groups.get_mut(group) else {
                    return;
                };
                let members = collection.direct_members();
                collection.listeners.push(Listener::Collider {
                    target,
                    callback: on_collide.clone(),
                });
                for member in members {
                    self.register_collider_shared(member, target, on_collide.clone());
                }
            }
        }
    }

    /// Fires `on_overlap` every frame in which `a` and `b` intersect.
    ///
    /// Groups are evaluated live, so members added after registration count.
    /// Registering the same pair twice creates two independent registrations.
    pub fn register_overlap<F>(&mut self, a: impl Into<Node>, b: impl Into<Node>, on_overlap: F)
    where
        F: FnMut(&mut PhysicsWorld, EntityId, EntityId) + Send + 'static,
    {
        let (a, b) = (a.into(), b.into());
        self.physics.registry.add_overlap(a, b, callback(on_overlap));
        debug!("overlap {:?} <-> {:?}", a, b);
    }

    /// First intersecting pair between the two nodes, ordered `(a side, b side)`.
    ///
    /// An entity never overlaps itself. Empty or dead nodes never overlap.
    pub fn overlap(&self, a: Node, b: Node) -> Option<(EntityId, EntityId)> {
        match (a, b) {
            (Node::Entity(first), Node::Entity(second)) => {
                if first == second {
                    return None;
                }
                let entity_a = self.entities.get(first)?;
                let entity_b = self.entities.get(second)?;
                entity_a
                    .aabb()
                    .intersects(&entity_b.aabb())
                    .then_some((first, second))
            }
            (Node::Group(_), Node::Entity(entity)) => {
                let query = self.entities.get(entity)?.aabb();
                self.members(a, Some(query))
                    .find_map(|member| self.overlap(Node::Entity(member), b))
            }
            (Node::Entity(entity), Node::Group(_)) => {
                let query = self.entities.get(entity)?.aabb();
                self.members(b, Some(query))
                    .find_map(|member| self.overlap(a, Node::Entity(member)))
            }
            (Node::Group(_), Node::Group(_)) => self.members(a, None).find_map(|member| {
                let query = self.entities.get(member)?.aabb();
                self.members(b, Some(query))
                    .find_map(|other| self.overlap(Node::Entity(member), Node::Entity(other)))
            }),
        }
    }

    /// Evaluates every overlap registration once and fires the callbacks of
    /// those that found an intersecting pair. Returns how many fired.
    ///
    /// The pass runs over the registrations present when it starts, so
    /// callbacks may destroy entities or register new pairs freely. Pairs
    /// whose side died earlier in the pass are skipped.
    pub fn update(&mut self) -> usize {
        let _timer = ScopedTimer::new("physics::overlaps");
        let pending: Vec<(Node, Node, SharedCallback)> = self
            .physics
            .registry
            .overlaps()
            .iter()
            .map(|pair| (pair.a, pair.b, pair.callback.clone()))
            .collect();

        let mut fired = 0;
        for (a, b, on_overlap) in pending {
            if !self.is_alive(a) || !self.is_alive(b) {
                continue;
            }
            if let Some((first, second)) = self.overlap(a, b) {
                fired += 1;
                self.dispatch(&on_overlap, first, second);
            }
        }
        fired
    }

    fn dispatch(&mut self, callback: &SharedCallback, a: EntityId, b: EntityId) {
        match callback.try_lock() {
            Some(mut call) => (&mut *call)(self, a, b),
            None => warn!("skipping re-entrant callback for {:?} / {:?}", a, b),
        }
    }
}
