use std::slice;

use super::{spatial::CellIter, Collection, CollectionKind, Node, SpatialIndex};
use crate::core::types::Aabb;
use crate::utils::allocator::{Arena, EntityId, GroupId};

enum Frame<'w> {
    Nodes(slice::Iter<'w, Node>),
    Entities(slice::Iter<'w, EntityId>),
    Cells {
        index: &'w SpatialIndex,
        cells: CellIter,
    },
}

enum Step<'w> {
    Yield(EntityId),
    Push(Frame<'w>),
    Pop,
    Skip,
}

/// Lazy depth-first walk over the entities reachable from a node.
///
/// Nested groups are flattened. Spatial indexes restrict the walk to the
/// cells covered by the query box; without a query they yield each indexed
/// entity once. An entity sharing several cells with the query is yielded
/// once per shared cell.
pub struct Members<'w> {
    groups: &'w Arena<Collection, GroupId>,
    query: Option<Aabb>,
    root: Option<EntityId>,
    stack: Vec<Frame<'w>>,
}

impl<'w> Members<'w> {
    pub(crate) fn new(
        groups: &'w Arena<Collection, GroupId>,
        node: Node,
        query: Option<Aabb>,
    ) -> Self {
        let mut members = Self {
            groups,
            query,
            root: None,
            stack: Vec::new(),
        };
        match node {
            Node::Entity(entity) => members.root = Some(entity),
            Node::Group(group) => {
                if let Some(frame) = Self::open(groups, query.as_ref(), group) {
                    members.stack.push(frame);
                }
            }
        }
        members
    }

    fn open(
        groups: &'w Arena<Collection, GroupId>,
        query: Option<&Aabb>,
        group: GroupId,
    ) -> Option<Frame<'w>> {
        let collection = groups.get(group)?;
        Some(match &collection.kind {
            CollectionKind::Group(group) => Frame::Nodes(group.members().iter()),
            CollectionKind::Spatial(index) => match query {
                Some(query) => Frame::Cells {
                    index,
                    cells: index.bounds_for(query).cells(),
                },
                None => Frame::Entities(index.entities().iter()),
            },
        })
    }

    fn cell_frame(index: &&'w SpatialIndex, cell: (i32, i32)) -> Option<Frame<'w>> {
        let index: &'w SpatialIndex = *index;
        index.cell(cell).map(|group| Frame::Nodes(group.members().iter()))
    }
}

impl<'w> Iterator for Members<'w> {
    type Item = EntityId;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entity) = self.root.take() {
            return Some(entity);
        }

        let groups = self.groups;
        let query = self.query;
        loop {
            let step = match self.stack.last_mut()? {
                Frame::Nodes(nodes) => match nodes.next() {
                    Some(Node::Entity(entity)) => Step::Yield(*entity),
                    Some(Node::Group(group)) => match Self::open(groups, query.as_ref(), *group) {
                        Some(frame) => Step::Push(frame),
                        None => Step::Skip,
                    },
                    None => Step::Pop,
                },
                Frame::Entities(entities) => match entities.next() {
                    Some(entity) => Step::Yield(*entity),
                    None => Step::Pop,
                },
                Frame::Cells { index, cells } => match cells.next() {
                    Some(cell) => match Self::cell_frame(index, cell) {
                        Some(frame) => Step::Push(frame),
                        None => Step::Skip,
                    },
                    None => Step::Pop,
                },
            };

            match step {
                Step::Yield(entity) => return Some(entity),
                Step::Push(frame) => self.stack.push(frame),
                Step::Pop => {
                    self.stack.pop();
                }
                Step::Skip => {}
            }
        }
    }
}
