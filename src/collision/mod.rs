//! Collision handling: narrow-phase resolution, the collider/overlap registry
//! and the engine that applies the resolution policy.

pub mod engine;
pub mod narrowphase;
pub mod registry;

pub use engine::PhysicsEngine;
pub use narrowphase::{Axis, Resolution};
pub use registry::{
    callback, observer, Collider, ColliderRegistry, OverlapPair, SharedCallback, SharedObserver,
};
