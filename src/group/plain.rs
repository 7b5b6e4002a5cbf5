use std::collections::HashSet;

use super::{Container, Node};
use crate::core::types::Aabb;

/// Insertion-ordered set of entities and nested groups.
#[derive(Debug, Clone, Default)]
pub struct Group {
    members: Vec<Node>,
    index: HashSet<Node>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &[Node] {
        &self.members
    }
}

impl Container for Group {
    fn insert(&mut self, node: Node, _bounds: Option<Aabb>) -> bool {
        if !self.index.insert(node) {
            return false;
        }
        self.members.push(node);
        true
    }

    fn remove(&mut self, node: Node) -> bool {
        if !self.index.remove(&node) {
            return false;
        }
        self.members.retain(|member| *member != node);
        true
    }

    fn clear(&mut self) -> Vec<Node> {
        self.index.clear();
        std::mem::take(&mut self.members)
    }

    fn contains(&self, node: Node) -> bool {
        self.index.contains(&node)
    }

    fn len(&self) -> usize {
        self.members.len()
    }
}
