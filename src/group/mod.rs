//! Entity collections: plain groups, the spatial index, add-listeners and
//! recursive member iteration.

pub mod iter;
pub mod plain;
pub mod spatial;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collision::registry::{SharedCallback, SharedObserver};
use crate::core::types::Aabb;
use crate::utils::allocator::{EntityId, GroupId};

pub use iter::Members;
pub use plain::Group;
pub use spatial::{CellBounds, CellIter, SpatialIndex};

/// Anything that can be a group member, a collision target, or one side of
/// an overlap registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Node {
    Entity(EntityId),
    Group(GroupId),
}

impl From<EntityId> for Node {
    fn from(id: EntityId) -> Self {
        Node::Entity(id)
    }
}

impl From<GroupId> for Node {
    fn from(id: GroupId) -> Self {
        Node::Group(id)
    }
}

/// Membership capability shared by [`Group`] and [`SpatialIndex`].
pub trait Container {
    /// Returns `true` when the node was not already a member.
    fn insert(&mut self, node: Node, bounds: Option<Aabb>) -> bool;
    /// Returns `true` when the node was a member.
    fn remove(&mut self, node: Node) -> bool;
    /// Empties the container, returning the removed members.
    fn clear(&mut self) -> Vec<Node>;
    fn contains(&self, node: Node) -> bool;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Storage flavour of a collection.
#[derive(Debug, Clone)]
pub enum CollectionKind {
    Group(Group),
    Spatial(SpatialIndex),
}

/// A group or spatial index as stored in the world, with its listeners and
/// the groups it is nested in.
#[derive(Debug)]
pub struct Collection {
    pub kind: CollectionKind,
    pub(crate) listeners: Listeners,
    pub(crate) owners: BTreeSet<GroupId>,
}

impl Collection {
    pub fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            listeners: Listeners::default(),
            owners: BTreeSet::new(),
        }
    }

    pub fn is_spatial(&self) -> bool {
        matches!(self.kind, CollectionKind::Spatial(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            CollectionKind::Group(group) => Some(group),
            CollectionKind::Spatial(_) => None,
        }
    }

    pub fn as_spatial(&self) -> Option<&SpatialIndex> {
        match &self.kind {
            CollectionKind::Spatial(index) => Some(index),
            CollectionKind::Group(_) => None,
        }
    }

    pub fn owners(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.owners.iter().copied()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Direct members; nested groups are not expanded.
    pub fn direct_members(&self) -> Vec<Node> {
        match &self.kind {
            CollectionKind::Group(group) => group.members().to_vec(),
            CollectionKind::Spatial(index) => {
                index.entities().iter().copied().map(Node::Entity).collect()
            }
        }
    }
}

impl Container for Collection {
    fn insert(&mut self, node: Node, bounds: Option<Aabb>) -> bool {
        match &mut self.kind {
            CollectionKind::Group(group) => group.insert(node, bounds),
            CollectionKind::Spatial(index) => index.insert(node, bounds),
        }
    }

    fn remove(&mut self, node: Node) -> bool {
        match &mut self.kind {
            CollectionKind::Group(group) => group.remove(node),
            CollectionKind::Spatial(index) => index.remove(node),
        }
    }

    fn clear(&mut self) -> Vec<Node> {
        match &mut self.kind {
            CollectionKind::Group(group) => group.clear(),
            CollectionKind::Spatial(index) => index.clear(),
        }
    }

    fn contains(&self, node: Node) -> bool {
        match &self.kind {
            CollectionKind::Group(group) => group.contains(node),
            CollectionKind::Spatial(index) => index.contains(node),
        }
    }

    fn len(&self) -> usize {
        match &self.kind {
            CollectionKind::Group(group) => group.len(),
            CollectionKind::Spatial(index) => index.len(),
        }
    }
}

/// Handle returned by `observe`, used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Reaction to a member being added to a collection.
#[derive(Clone)]
pub enum Listener {
    /// Registers every new member as a mover against `target`.
    Collider {
        target: Node,
        callback: SharedCallback,
    },
    /// Host-supplied observer.
    Observer(SharedObserver),
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listener::Collider { target, .. } => {
                f.debug_struct("Collider").field("target", target).finish_non_exhaustive()
            }
            Listener::Observer(_) => f.write_str("Observer(..)"),
        }
    }
}

/// Ordered publish/subscribe list for member additions.
#[derive(Debug, Default)]
pub struct Listeners {
    entries: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl Listeners {
    pub fn push(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Copies the current listeners so they can run while the world is borrowed mutably.
    pub fn snapshot(&self) -> Vec<Listener> {
        self.entries.iter().map(|(_, listener)| listener.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
