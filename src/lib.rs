//! Arcade2D – entity groups and AABB collisions for 2D games.
//!
//! Entities are axis-aligned rectangles owned by a [`PhysicsWorld`]. They can
//! be collected into nested [`Group`]s or into a [`SpatialIndex`], a uniform
//! grid that limits collision queries to nearby cells. Moving entities are
//! registered as colliders against entities or groups and are pushed out of
//! whatever they run into; overlap registrations report intersecting pairs
//! once per frame.
//!
//! ```
//! use arcade2d::{Entity, PhysicsWorld};
//!
//! let mut world = PhysicsWorld::new();
//! let player = world
//!     .spawn(Entity::builder().position(0.0, 0.0).size(32.0, 32.0).velocity(100.0, 0.0).pushable(true))
//!     .unwrap();
//! let wall = world
//!     .spawn(Entity::builder().position(40.0, 0.0).size(32.0, 32.0))
//!     .unwrap();
//! world.register_collider(player, wall, |_, _, _| {});
//!
//! world.update_entity(player, 0.1);
//! assert_eq!(world.entity(player).unwrap().x(), 8.0);
//! ```

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod group;
pub mod utils;
pub mod world;

pub use glam::Vec2;

pub use collision::{
    engine::PhysicsEngine,
    narrowphase::{Axis, Resolution},
    registry::{ColliderRegistry, SharedCallback, SharedObserver},
};
pub use config::{ImmovablePairPolicy, PhysicsConfig};
pub use core::{
    entity::{Entity, EntityBuilder},
    types::{Aabb, Side, Touching},
};
pub use dynamics::{FrameClock, Integrator};
pub use error::{EngineError, EngineResult};
pub use group::{CellBounds, Collection, Container, Group, ListenerId, Members, Node, SpatialIndex};
pub use utils::allocator::{Arena, EntityId, GenerationalId, GroupId};
pub use world::PhysicsWorld;
