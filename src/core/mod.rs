//! Core types describing entities and their geometry.

pub mod types;
pub mod entity;

pub use types::{Aabb, Side, Touching};
pub use entity::{Entity, EntityBuilder};
