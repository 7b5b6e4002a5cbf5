use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::marker::PhantomData;

/// Unique identifier with generation tracking to prevent stale references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct GenerationalId {
    pub index: usize,
    pub generation: u32,
}

impl GenerationalId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Typed handle that an [`Arena`] can hand out.
pub trait ArenaId: Copy {
    fn from_raw(raw: GenerationalId) -> Self;
    fn raw(self) -> GenerationalId;

    fn index(self) -> usize {
        self.raw().index
    }

    fn generation(self) -> u32 {
        self.raw().generation
    }
}

macro_rules! arena_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
        pub struct $name(pub GenerationalId);

        impl $name {
            pub fn new(index: usize, generation: u32) -> Self {
                Self(GenerationalId::new(index, generation))
            }

            pub fn from_index(index: u32) -> Self {
                Self::new(index as usize, 0)
            }

            pub fn index(&self) -> usize {
                self.0.index
            }

            pub fn generation(&self) -> u32 {
                self.0.generation
            }

            pub fn is_null(&self) -> bool {
                self.0.index == usize::MAX
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self(GenerationalId::new(usize::MAX, 0))
            }
        }

        impl ArenaId for $name {
            fn from_raw(raw: GenerationalId) -> Self {
                Self(raw)
            }

            fn raw(self) -> GenerationalId {
                self.0
            }
        }
    };
}

arena_handle!(
    /// Handle to an entity stored in the world.
    EntityId
);

arena_handle!(
    /// Handle to a group or spatial index stored in the world.
    GroupId
);

/// Generational arena that hands out stable IDs while preventing use-after-free.
pub struct Arena<T, I: ArenaId = EntityId> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<usize>,
    _id: PhantomData<fn() -> I>,
}

impl<T, I: ArenaId> Default for Arena<T, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, I: ArenaId> Arena<T, I> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
            _id: PhantomData,
        }
    }

    pub fn insert(&mut self, item: T) -> I {
        self.insert_with(|_| item)
    }

    /// Inserts a value built from the handle it is about to receive.
    pub fn insert_with(&mut self, build: impl FnOnce(I) -> T) -> I {
        if let Some(index) = self.free_list.pop_front() {
            let id = I::from_raw(GenerationalId::new(index, self.generations[index]));
            self.items[index] = Some(build(id));
            return id;
        }

        let index = self.items.len();
        let id = I::from_raw(GenerationalId::new(index, 0));
        self.items.push(Some(build(id)));
        self.generations.push(0);
        id
    }

    pub fn get(&self, id: I) -> Option<&T> {
        if self.is_valid(id) {
            self.items.get(id.index()).and_then(|slot| slot.as_ref())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        if self.is_valid(id) {
            self.items.get_mut(id.index()).and_then(|slot| slot.as_mut())
        } else {
            None
        }
    }

    pub fn get2_mut(&mut self, id_a: I, id_b: I) -> Option<(&mut T, &mut T)> {
        if id_a.index() == id_b.index() {
            return None;
        }

        if !self.is_valid(id_a) || !self.is_valid(id_b) {
            return None;
        }

        let (first, second, flipped) = if id_a.index() < id_b.index() {
            (id_a, id_b, false)
        } else {
            (id_b, id_a, true)
        };

        let second_index = second.index();
        if second_index >= self.items.len() {
            return None;
        }

        let (left, right) = self.items.split_at_mut(second_index);
        let first_slot = left
            .get_mut(first.index())
            .and_then(|slot| slot.as_mut())?;
        let second_slot = right.get_mut(0).and_then(|slot| slot.as_mut())?;

        if flipped {
            Some((second_slot, first_slot))
        } else {
            Some((first_slot, second_slot))
        }
    }

    pub fn contains(&self, id: I) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: I) -> Option<T> {
        if !self.is_valid(id) {
            return None;
        }
        let slot = self.items.get_mut(id.index())?;
        if slot.is_some() {
            self.generations[id.index()] = self.generations[id.index()].wrapping_add(1);
            self.free_list.push_back(id.index());
        }
        slot.take()
    }

    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> + '_ {
        self.items.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref().map(|item| {
                (
                    I::from_raw(GenerationalId::new(index, self.generations[index])),
                    item,
                )
            })
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.items.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_valid(&self, id: I) -> bool {
        self.generations
            .get(id.index())
            .copied()
            .map(|gen| gen == id.generation())
            .unwrap_or(false)
    }
}
